//! Moving Average Convergence Divergence (MACD).
//!
//! line = EMA(fast) - EMA(slow), signal = EMA(line, signal), histogram = line - signal.
//! Lookback (12/26/9): line = 26, signal and histogram = 35.

use super::ema::ema_of_series;
use super::{closes, Indicator, Series};
use crate::domain::Candle;

/// Which MACD output to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Line,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(slow > fast, "MACD slow period must exceed fast period");
        Self {
            fast,
            slow,
            signal,
            line,
        }
    }

    pub fn standard(line: MacdLine) -> Self {
        Self::new(12, 26, 9, line)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        match self.line {
            MacdLine::Line => "macd",
            MacdLine::Signal => "macd_signal",
            MacdLine::Histogram => "macd_hist",
        }
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Line => self.slow,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let (line, signal, hist) = macd_lines(&closes(candles), self.fast, self.slow, self.signal);
        match self.line {
            MacdLine::Line => line,
            MacdLine::Signal => signal,
            MacdLine::Histogram => hist,
        }
    }
}

/// Compute (line, signal, histogram) together.
pub fn macd_lines(
    values: &[Option<f64>],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Series, Series, Series) {
    let fast_ema = ema_of_series(values, fast);
    let slow_ema = ema_of_series(values, slow);
    let line: Series = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema_of_series(&line, signal);
    let hist = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();
    (line, signal_line, hist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_candles, DEFAULT_EPSILON};

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5 + (i as f64).cos()).collect()
    }

    #[test]
    fn warmup_matches_lookback() {
        let candles = make_candles(&ramp(60));
        for line in [MacdLine::Line, MacdLine::Signal, MacdLine::Histogram] {
            let macd = Macd::standard(line);
            let out = macd.compute(&candles);
            let lb = macd.lookback();
            assert!(out[..lb].iter().all(Option::is_none), "{line:?} defined early");
            assert!(out[lb].is_some(), "{line:?} undefined at lookback {lb}");
        }
        assert_eq!(Macd::standard(MacdLine::Line).lookback(), 26);
        assert_eq!(Macd::standard(MacdLine::Histogram).lookback(), 35);
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let candles = make_candles(&ramp(80));
        let (line, signal, hist) = macd_lines(&closes(&candles), 12, 26, 9);
        for i in 35..80 {
            let expected = line[i].unwrap() - signal[i].unwrap();
            assert!((hist[i].unwrap() - expected).abs() < DEFAULT_EPSILON);
        }
    }

    #[test]
    fn flat_series_has_zero_macd() {
        let candles = make_candles(&[50.0; 60]);
        let hist = Macd::standard(MacdLine::Histogram).compute(&candles);
        assert!(hist[59].unwrap().abs() < DEFAULT_EPSILON);
    }

    #[test]
    fn rising_series_has_positive_line() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let line = Macd::standard(MacdLine::Line).compute(&make_candles(&closes));
        assert!(line[59].unwrap() > 0.0);
    }
}

//! Stochastic RSI.
//!
//! raw[t] = 100 * (RSI[t] - min(RSI, period)) / (max(RSI, period) - min(RSI, period))
//! %K = SMA(raw, smooth_k), %D = SMA(%K, smooth_d).
//! A flat RSI window (max == min) has no defined position and yields `None`.
//! Lookback (14/14/3/3): %K = 29, %D = 31.

use super::rsi::rsi_of_series;
use super::sma::sma_of_series;
use super::{closes, Indicator, Series};
use crate::domain::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochRsiLine {
    K,
    D,
}

#[derive(Debug, Clone)]
pub struct StochRsi {
    rsi_period: usize,
    stoch_period: usize,
    smooth_k: usize,
    smooth_d: usize,
    line: StochRsiLine,
    name: String,
}

impl StochRsi {
    pub fn new(period: usize, smooth_k: usize, smooth_d: usize, line: StochRsiLine) -> Self {
        assert!(period >= 1, "Stochastic RSI period must be >= 1");
        assert!(smooth_k >= 1 && smooth_d >= 1, "smoothing periods must be >= 1");
        let name = match line {
            StochRsiLine::K => "stochrsi_k".to_string(),
            StochRsiLine::D => "stochrsi_d".to_string(),
        };
        Self {
            rsi_period: period,
            stoch_period: period,
            smooth_k,
            smooth_d,
            line,
            name,
        }
    }

    pub fn k(period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        Self::new(period, smooth_k, smooth_d, StochRsiLine::K)
    }

    pub fn d(period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        Self::new(period, smooth_k, smooth_d, StochRsiLine::D)
    }
}

impl Indicator for StochRsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k = self.rsi_period + (self.stoch_period - 1) + (self.smooth_k - 1);
        match self.line {
            StochRsiLine::K => k,
            StochRsiLine::D => k + self.smooth_d - 1,
        }
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let (k, d) = stoch_rsi_lines(
            &closes(candles),
            self.rsi_period,
            self.stoch_period,
            self.smooth_k,
            self.smooth_d,
        );
        match self.line {
            StochRsiLine::K => k,
            StochRsiLine::D => d,
        }
    }
}

/// Compute (%K, %D) in one pass.
pub fn stoch_rsi_lines(
    values: &[Option<f64>],
    rsi_period: usize,
    stoch_period: usize,
    smooth_k: usize,
    smooth_d: usize,
) -> (Series, Series) {
    let rsi = rsi_of_series(values, rsi_period);
    let raw = stochastic_of_series(&rsi, stoch_period);
    let k = sma_of_series(&raw, smooth_k);
    let d = sma_of_series(&k, smooth_d);
    (k, d)
}

/// Position of each value inside its own rolling high/low range, scaled to 0–100.
fn stochastic_of_series(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let Some(current) = values[i] else {
            continue;
        };
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut complete = true;
        for v in window {
            match v {
                Some(x) => {
                    lo = lo.min(*x);
                    hi = hi.max(*x);
                }
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete && hi > lo {
            result[i] = Some((100.0 * (current - lo) / (hi - lo)).clamp(0.0, 100.0));
        }
    }

    result
}

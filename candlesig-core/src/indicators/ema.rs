//! Exponential Moving Average (EMA).
//!
//! Seed: SMA of the first `period` values.
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! The first emitted value is at the first candle with `period` prior values,
//! so EMA(n) is undefined for indices 0..n and defined from index n.
//! Lookback: period.

use super::{closes, Indicator, Series};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        ema_of_series(&closes(candles), self.period)
    }
}

/// EMA of an arbitrary optional series.
///
/// The seed window starts at the first defined value and must be `period`
/// consecutive defined values. A gap after seeding leaves the remainder undefined.
pub fn ema_of_series(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 {
        return result;
    }

    let Some(start) = values.iter().position(Option::is_some) else {
        return result;
    };
    let seed_end = start + period;
    if seed_end >= n {
        return result;
    }

    let mut sum = 0.0;
    for v in &values[start..seed_end] {
        match v {
            Some(x) => sum += x,
            None => return result,
        }
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = sum / period as f64;
    for i in seed_end..n {
        let Some(x) = values[i] else {
            return result;
        };
        let ema = alpha * x + (1.0 - alpha) * prev;
        result[i] = Some(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_some_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn ema_3_known_values() {
        // Closes: 10, 11, 12, 13, 14
        // alpha = 0.5, seed = SMA(10,11,12) = 11.0
        // EMA[3] = 0.5*13 + 0.5*11 = 12.0
        // EMA[4] = 0.5*14 + 0.5*12 = 13.0
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Ema::new(3).compute(&candles);

        assert!(result[..3].iter().all(Option::is_none));
        assert_some_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_some_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let candles = make_candles(&[50.0; 30]);
        let result = Ema::new(9).compute(&candles);
        for v in result.iter().skip(9) {
            assert_some_approx(*v, 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_200_warmup_boundary() {
        let closes: Vec<f64> = (0..210).map(|i| 100.0 + i as f64 * 0.1).collect();

        let exactly_200 = Ema::new(200).compute(&make_candles(&closes[..200]));
        assert!(exactly_200.iter().all(Option::is_none));

        let with_210 = Ema::new(200).compute(&make_candles(&closes));
        assert!(with_210[199].is_none());
        assert!(with_210[200].is_some());
        assert!(with_210[209].is_some());
    }

    #[test]
    fn ema_of_series_skips_undefined_prefix() {
        let values = vec![None, None, Some(10.0), Some(11.0), Some(12.0), Some(13.0)];
        let result = ema_of_series(&values, 3);
        assert!(result[..5].iter().all(Option::is_none));
        assert_some_approx(result[5], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_of_series_gap_after_seed_stops_output() {
        let values = vec![Some(10.0), Some(11.0), Some(12.0), Some(13.0), None, Some(15.0)];
        let result = ema_of_series(&values, 3);
        assert!(result[3].is_some());
        assert!(result[4].is_none());
        assert!(result[5].is_none());
    }

    #[test]
    fn ema_lookback() {
        assert_eq!(Ema::new(21).lookback(), 21);
        assert_eq!(Ema::new(21).name(), "ema_21");
    }
}

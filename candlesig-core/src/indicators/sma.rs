//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window of close prices or volume.
//! Lookback: period - 1 (first valid value at index period-1).

use super::{Indicator, Series};
use crate::domain::Candle;

/// Which candle field the average is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmaSource {
    Close,
    Volume,
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    source: SmaSource,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self::over(period, SmaSource::Close)
    }

    pub fn over(period: usize, source: SmaSource) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        let name = match source {
            SmaSource::Close => format!("sma_{period}"),
            SmaSource::Volume => format!("vol_sma_{period}"),
        };
        Self {
            period,
            source,
            name,
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let values: Series = candles
            .iter()
            .map(|c| match self.source {
                SmaSource::Close => Some(c.close),
                SmaSource::Volume => Some(c.volume),
            })
            .collect();
        sma_of_series(&values, self.period)
    }
}

/// Rolling mean of an optional series. A window containing any `None` yields `None`.
pub fn sma_of_series(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        let mut sum = 0.0;
        let mut complete = true;
        for v in window {
            match v {
                Some(x) => sum += x,
                None => {
                    complete = false;
                    break;
                }
            }
        }
        if complete {
            result[i] = Some(sum / period as f64);
        }
    }

    result
}

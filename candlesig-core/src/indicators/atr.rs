//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (TR[0] has no previous close, so the seed starts at TR[1]).

use super::{Indicator, Series};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from candles.
/// TR[0] = None (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Series {
    let mut tr = vec![None; candles.len()];
    for (i, pair) in candles.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let pc = prev.close;
        tr[i + 1] = Some(
            (cur.high - cur.low)
                .max((cur.high - pc).abs())
                .max((cur.low - pc).abs()),
        );
    }
    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first `period` values starting at the first defined one,
/// placed on the last seed index. A gap after the seed ends the output.
pub fn wilder_smooth(values: &[Option<f64>], period: usize) -> Series {
    let n = values.len();
    let mut result = vec![None; n];
    if period == 0 {
        return result;
    }

    let Some(seed_start) = values.iter().position(Option::is_some) else {
        return result;
    };
    let seed_end = seed_start + period;
    if seed_end > n {
        return result;
    }

    let mut sum = 0.0;
    for v in &values[seed_start..seed_end] {
        match v {
            Some(x) => sum += x,
            None => return result,
        }
    }
    let mut prev = sum / period as f64;
    result[seed_end - 1] = Some(prev);

    let alpha = 1.0 / period as f64;
    for i in seed_end..n {
        let Some(x) = values[i] else {
            return result;
        };
        prev = alpha * x + (1.0 - alpha) * prev;
        result[i] = Some(prev);
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        wilder_smooth(&true_range(candles), self.period)
    }
}

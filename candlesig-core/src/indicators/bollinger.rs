//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances, or all at once through
//! [`bollinger_bands`]):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::{Indicator, Series};
use crate::domain::Candle;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

impl BollingerBand {
    fn column_name(self) -> &'static str {
        match self {
            BollingerBand::Upper => "bb_upper",
            BollingerBand::Middle => "bb_middle",
            BollingerBand::Lower => "bb_lower",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        Self {
            period,
            multiplier,
            band,
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        self.band.column_name()
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let (upper, middle, lower) = bollinger_bands(candles, self.period, self.multiplier);
        match self.band {
            BollingerBand::Upper => upper,
            BollingerBand::Middle => middle,
            BollingerBand::Lower => lower,
        }
    }
}

/// Compute (upper, middle, lower) in one pass over the closes.
pub fn bollinger_bands(candles: &[Candle], period: usize, multiplier: f64) -> (Series, Series, Series) {
    let n = candles.len();
    let mut upper = vec![None; n];
    let mut middle = vec![None; n];
    let mut lower = vec![None; n];
    if period == 0 || n < period {
        return (upper, middle, lower);
    }

    for i in (period - 1)..n {
        let window = &candles[i + 1 - period..=i];
        let mean = window.iter().map(|c| c.close).sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let width = multiplier * variance.sqrt();
        upper[i] = Some(mean + width);
        middle[i] = Some(mean);
        lower[i] = Some(mean - width);
    }

    (upper, middle, lower)
}

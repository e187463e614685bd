//! Cumulative Volume-Weighted Average Price (VWAP).
//!
//! VWAP[t] = sum(typical_price * volume) / sum(volume) over candles 0..=t,
//! typical_price = (high + low + close) / 3.
//! Undefined while cumulative volume is zero.

use super::{Indicator, Series};
use crate::domain::Candle;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let mut pv = 0.0;
        let mut vol = 0.0;
        candles
            .iter()
            .map(|c| {
                pv += c.typical_price() * c.volume;
                vol += c.volume;
                (vol > 0.0).then(|| pv / vol)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_some_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn vwap_weights_by_volume() {
        let mut candles = make_candles(&[10.0, 20.0]);
        candles[0].volume = 1.0;
        candles[1].volume = 3.0;
        let tp0 = candles[0].typical_price();
        let tp1 = candles[1].typical_price();
        let vwap = Vwap::new().compute(&candles);
        assert_some_approx(vwap[0], tp0, DEFAULT_EPSILON);
        assert_some_approx(vwap[1], (tp0 + 3.0 * tp1) / 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn vwap_undefined_until_volume() {
        let mut candles = make_candles(&[10.0, 11.0, 12.0]);
        candles[0].volume = 0.0;
        candles[1].volume = 0.0;
        let vwap = Vwap::new().compute(&candles);
        assert!(vwap[0].is_none());
        assert!(vwap[1].is_none());
        assert!(vwap[2].is_some());
    }
}

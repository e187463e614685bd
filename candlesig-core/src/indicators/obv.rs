//! On-Balance Volume (OBV).
//!
//! OBV[0] = 0; each later candle adds its volume on an up close, subtracts it
//! on a down close and carries the total on an unchanged close.
//! Lookback: 0.

use super::{Indicator, Series};
use crate::domain::Candle;

#[derive(Debug, Clone, Default)]
pub struct Obv;

impl Obv {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Obv {
    fn name(&self) -> &str {
        "obv"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Series {
        let mut result = Vec::with_capacity(candles.len());
        let mut total = 0.0;
        for (i, c) in candles.iter().enumerate() {
            if i > 0 {
                let prev = candles[i - 1].close;
                if c.close > prev {
                    total += c.volume;
                } else if c.close < prev {
                    total -= c.volume;
                }
            }
            result.push(Some(total));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_some_approx, make_candles, DEFAULT_EPSILON};

    #[test]
    fn obv_accumulates_signed_volume() {
        let mut candles = make_candles(&[10.0, 11.0, 10.5, 10.5, 12.0]);
        for (c, v) in candles.iter_mut().zip([100.0, 200.0, 50.0, 70.0, 30.0]) {
            c.volume = v;
        }
        let obv = Obv::new().compute(&candles);
        assert_some_approx(obv[0], 0.0, DEFAULT_EPSILON);
        assert_some_approx(obv[1], 200.0, DEFAULT_EPSILON);
        assert_some_approx(obv[2], 150.0, DEFAULT_EPSILON);
        assert_some_approx(obv[3], 150.0, DEFAULT_EPSILON);
        assert_some_approx(obv[4], 180.0, DEFAULT_EPSILON);
    }

    #[test]
    fn obv_empty_input() {
        assert!(Obv::new().compute(&[]).is_empty());
    }
}

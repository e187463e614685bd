//! Seeded synthetic candles for demos and benchmarks.
//!
//! The same (params, seed) always produces the same series. These are clearly
//! fake prices and never a substitute for exchange history.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use candlesig_core::domain::{Candle, CandleSeries, SeriesError, Timeframe};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticParams {
    pub start_price: f64,
    /// Mean return per candle.
    pub drift: f64,
    /// Half-width of the uniform per-candle return.
    pub volatility: f64,
    /// Maximum wick extension as a fraction of the body extreme.
    pub wick: f64,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            drift: 0.0,
            volatility: 0.01,
            wick: 0.005,
        }
    }
}

/// Deterministic seed for a (symbol, timeframe) pair.
pub fn pair_seed(symbol: &str, timeframe: Timeframe) -> u64 {
    symbol
        .bytes()
        .chain(timeframe.as_str().bytes())
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

/// `count` candles ending with the candle that opens at `end`.
pub fn random_walk(
    symbol: &str,
    timeframe: Timeframe,
    count: usize,
    end: DateTime<Utc>,
    params: &SyntheticParams,
    seed: u64,
) -> Result<CandleSeries, SeriesError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let step = timeframe.duration();
    let start = end - step * (count.saturating_sub(1) as i32);

    let mut price = params.start_price;
    let mut candles = Vec::with_capacity(count);
    for i in 0..count {
        let ret = params.drift + rng.gen_range(-params.volatility..=params.volatility);
        let open = price;
        let close = f64::max(open * (1.0 + ret), 0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..=params.wick));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..=params.wick));
        let volume = rng.gen_range(500.0..5_000.0);

        candles.push(Candle {
            timestamp: start + step * i as i32,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    CandleSeries::new(symbol, timeframe, candles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn same_seed_same_series() {
        let p = SyntheticParams::default();
        let a = random_walk("BTCUSDT", Timeframe::H1, 300, end(), &p, 7).unwrap();
        let b = random_walk("BTCUSDT", Timeframe::H1, 300, end(), &p, 7).unwrap();
        let c = random_walk("BTCUSDT", Timeframe::H1, 300, end(), &p, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn candles_are_well_formed_and_spaced() {
        let series = random_walk(
            "ETHUSDT",
            Timeframe::M15,
            250,
            end(),
            &SyntheticParams::default(),
            pair_seed("ETHUSDT", Timeframe::M15),
        )
        .unwrap();
        assert_eq!(series.len(), 250);
        assert!(series.rejected().is_empty());
        assert_eq!(series.last().unwrap().timestamp, end());
        for pair in series.candles().windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Timeframe::M15.duration());
        }
    }

    #[test]
    fn pair_seed_differs_by_timeframe() {
        assert_ne!(pair_seed("BTCUSDT", Timeframe::H1), pair_seed("BTCUSDT", Timeframe::H4));
    }
}

//! Concrete indicator implementations and the snapshot that bundles them.
//!
//! Every indicator implements [`Indicator`]: candle history in, one value per
//! candle out. Values that are not yet available (warm-up prefix) are `None`,
//! never a sentinel number, so downstream rules cannot trigger on synthetic
//! zeros.
//!
//! Multi-series indicators (MACD, Stochastic RSI, Bollinger) are exposed as
//! separate named instances per line, keeping the single-series trait unchanged.
//! Each also has a function returning all of its lines from one computation.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod snapshot;
pub mod stoch_rsi;
pub mod vwap;

pub use atr::Atr;
pub use bollinger::{bollinger_bands, Bollinger, BollingerBand};
pub use ema::Ema;
pub use macd::{macd_lines, Macd, MacdLine};
pub use obv::Obv;
pub use rsi::Rsi;
pub use sma::{Sma, SmaSource};
pub use snapshot::{compute_indicators, enrich, Column, EnrichedSeries, IndicatorRow, IndicatorSnapshot};
pub use stoch_rsi::{stoch_rsi_lines, StochRsi, StochRsiLine};
pub use vwap::Vwap;

use crate::domain::Candle;

/// One optional value per candle.
pub type Series = Vec<Option<f64>>;

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No value at candle t may depend on data from candle t+1 or later.
pub trait Indicator: Send + Sync {
    /// Column-style name (e.g., "ema_21", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading candles whose output is `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the whole candle slice.
    ///
    /// Returns a series of the same length as `candles`.
    fn compute(&self, candles: &[Candle]) -> Series;
}

pub(crate) fn closes(candles: &[Candle]) -> Series {
    candles.iter().map(|c| Some(c.close)).collect()
}

/// Create synthetic hourly candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Unwrap a defined value and compare.
#[cfg(test)]
pub fn assert_some_approx(actual: Option<f64>, expected: f64, epsilon: f64) {
    match actual {
        Some(v) => assert_approx(v, expected, epsilon),
        None => panic!("expected Some({expected}), got None"),
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Shared fixtures for runner integration tests.

#![allow(dead_code)]

use candlesig_core::domain::{Candle, Timeframe};
use candlesig_runner::MemorySource;
use chrono::{DateTime, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap()
}

/// Uptrend with a 20-candle oscillation: close = 100 + 0.5 i + 5 sin(2π(i + 15) / 20).
///
/// The last candle sits just below its 20-period mean with RSI in the
/// high 50s, so a long scores the Bollinger-middle bonus and nothing
/// overbought.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let phase = 2.0 * std::f64::consts::PI * (i as f64 + 15.0) / 20.0;
            100.0 + 0.5 * i as f64 + 5.0 * phase.sin()
        })
        .collect()
}

/// Candles for `closes` on `timeframe`, the last one opening at `end`.
pub fn candles(closes: &[f64], timeframe: Timeframe, end: DateTime<Utc>) -> Vec<Candle> {
    let step = timeframe.duration();
    let start = end - step * (closes.len() as i32 - 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: start + step * i as i32,
                open,
                high: open.max(close) + 0.5,
                low: open.min(close) - 0.5,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// BTCUSDT with 220 wave candles on 1h and 4h.
pub fn wave_source() -> MemorySource {
    let source = MemorySource::new();
    let closes = wave_closes(220);
    for tf in [Timeframe::H1, Timeframe::H4] {
        source.insert("BTCUSDT", tf, candles(&closes, tf, now()));
    }
    source
}

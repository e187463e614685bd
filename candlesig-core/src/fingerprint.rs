//! Dataset fingerprinting: a BLAKE3 content hash of the exact candles a
//! signal was computed from, embedded in the persisted snapshot for audit.

use crate::domain::{CandleSeries, DatasetHash};

/// Hash symbol, timeframe and every accepted candle of `series`.
///
/// Two series hash equal iff they hold bit-identical candles for the same
/// pair. Rejected candles do not contribute.
pub fn series_fingerprint(series: &CandleSeries) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(series.symbol().as_bytes());
    hasher.update(&[0]);
    hasher.update(series.timeframe().as_str().as_bytes());
    hasher.update(&[0]);
    for c in series.candles() {
        hasher.update(&c.timestamp.timestamp_millis().to_le_bytes());
        for v in [c.open, c.high, c.low, c.close, c.volume] {
            hasher.update(&v.to_bits().to_le_bytes());
        }
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timeframe;
    use crate::indicators::make_candles;

    fn series(symbol: &str, tf: Timeframe, closes: &[f64]) -> CandleSeries {
        CandleSeries::new(symbol, tf, make_candles(closes)).unwrap()
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = series("BTCUSDT", Timeframe::H1, &[1.5, 2.0, 2.5]);
        let b = series("BTCUSDT", Timeframe::H1, &[1.5, 2.0, 2.5]);
        assert_eq!(series_fingerprint(&a), series_fingerprint(&b));
        assert_eq!(series_fingerprint(&a).as_str().len(), 64);
    }

    #[test]
    fn fingerprint_covers_pair_and_values() {
        let base = series("BTCUSDT", Timeframe::H1, &[1.5, 2.0, 2.5]);
        let other_symbol = series("ETHUSDT", Timeframe::H1, &[1.5, 2.0, 2.5]);
        let other_tf = series("BTCUSDT", Timeframe::H4, &[1.5, 2.0, 2.5]);
        let other_close = series("BTCUSDT", Timeframe::H1, &[1.5, 2.0, 2.6]);

        let h = series_fingerprint(&base);
        assert_ne!(h, series_fingerprint(&other_symbol));
        assert_ne!(h, series_fingerprint(&other_tf));
        assert_ne!(h, series_fingerprint(&other_close));
    }
}

//! Candles, the fundamental market data unit, and the validated series built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Timeframe;

/// OHLCV candle for one symbol on one timeframe.
///
/// `timestamp` is the candle open time in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Why a candle was excluded from a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum MalformedCandle {
    #[error("non-finite OHLCV value")]
    NonFinite,

    #[error("high/low do not bracket open/close")]
    InconsistentRange,

    #[error("non-positive price")]
    NonPositivePrice,

    #[error("negative volume")]
    NegativeVolume,

    #[error("duplicate timestamp")]
    DuplicateTimestamp,
}

impl Candle {
    /// Validate a single candle in isolation.
    pub fn check(&self) -> Result<(), MalformedCandle> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(MalformedCandle::NonFinite);
        }
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(MalformedCandle::NonPositivePrice);
        }
        if self.high < self.open.max(self.close) || self.low > self.open.min(self.close) {
            return Err(MalformedCandle::InconsistentRange);
        }
        if self.volume < 0.0 {
            return Err(MalformedCandle::NegativeVolume);
        }
        Ok(())
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// A candle that was dropped while building a [`CandleSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RejectedCandle {
    pub timestamp: DateTime<Utc>,
    pub reason: MalformedCandle,
}

/// Errors constructing a series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("symbol must not be empty")]
    EmptySymbol,
}

/// Ordered candles for one (symbol, timeframe) pair.
///
/// Construction canonicalizes the input: candles are sorted by timestamp,
/// malformed candles and repeated timestamps (first occurrence wins) are
/// excluded, and every exclusion is kept in [`CandleSeries::rejected`].
/// Once built the series is never mutated; indicator stages only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
    rejected: Vec<RejectedCandle>,
}

impl CandleSeries {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        raw: Vec<Candle>,
    ) -> Result<Self, SeriesError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(SeriesError::EmptySymbol);
        }

        let mut raw = raw;
        // Stable sort keeps the first-seen candle ahead of later duplicates.
        raw.sort_by_key(|c| c.timestamp);

        let mut candles: Vec<Candle> = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for candle in raw {
            if let Err(reason) = candle.check() {
                rejected.push(RejectedCandle {
                    timestamp: candle.timestamp,
                    reason,
                });
                continue;
            }
            if candles.last().is_some_and(|prev| prev.timestamp == candle.timestamp) {
                rejected.push(RejectedCandle {
                    timestamp: candle.timestamp,
                    reason: MalformedCandle::DuplicateTimestamp,
                });
                continue;
            }
            candles.push(candle);
        }

        Ok(Self {
            symbol,
            timeframe,
            candles,
            rejected,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Candles excluded during construction, in timestamp order.
    pub fn rejected(&self) -> &[RejectedCandle] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// A new series holding only the most recent `n` candles.
    ///
    /// Rejections are carried over so the audit trail survives truncation.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.candles.len().saturating_sub(n);
        Self {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            candles: self.candles[start..].to_vec(),
            rejected: self.rejected.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, hour, 0, 0).unwrap()
    }

    fn sample_candle(hour: u32) -> Candle {
        Candle {
            timestamp: ts(hour),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn well_formed_candle_passes_check() {
        assert_eq!(sample_candle(0).check(), Ok(()));
    }

    #[test]
    fn candle_detects_non_finite() {
        let mut c = sample_candle(0);
        c.close = f64::NAN;
        assert_eq!(c.check(), Err(MalformedCandle::NonFinite));
        c.close = f64::INFINITY;
        assert_eq!(c.check(), Err(MalformedCandle::NonFinite));
    }

    #[test]
    fn candle_detects_inverted_range() {
        let mut c = sample_candle(0);
        c.high = 101.0; // below close
        assert_eq!(c.check(), Err(MalformedCandle::InconsistentRange));
    }

    #[test]
    fn candle_detects_negative_volume() {
        let mut c = sample_candle(0);
        c.volume = -1.0;
        assert_eq!(c.check(), Err(MalformedCandle::NegativeVolume));
    }

    #[test]
    fn series_sorts_and_records_rejections() {
        let mut bad = sample_candle(1);
        bad.low = 104.0;
        let raw = vec![sample_candle(3), bad, sample_candle(0), sample_candle(2)];

        let series = CandleSeries::new("BTCUSDT", Timeframe::H1, raw).unwrap();

        let hours: Vec<_> = series.candles().iter().map(|c| c.timestamp).collect();
        assert_eq!(hours, vec![ts(0), ts(2), ts(3)]);
        assert_eq!(series.rejected().len(), 1);
        assert_eq!(series.rejected()[0].timestamp, ts(1));
        assert_eq!(series.rejected()[0].reason, MalformedCandle::InconsistentRange);
    }

    #[test]
    fn series_keeps_first_duplicate() {
        let first = sample_candle(0);
        let mut second = sample_candle(0);
        second.close = 104.0;

        let series = CandleSeries::new("BTCUSDT", Timeframe::H1, vec![first, second]).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.candles()[0].close, 103.0);
        assert_eq!(series.rejected()[0].reason, MalformedCandle::DuplicateTimestamp);
    }

    #[test]
    fn series_rejects_empty_symbol() {
        assert!(CandleSeries::new("  ", Timeframe::H1, vec![]).is_err());
    }

    #[test]
    fn tail_keeps_most_recent() {
        let raw = (0..5).map(sample_candle).collect();
        let series = CandleSeries::new("ETHUSDT", Timeframe::H1, raw).unwrap();
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.candles()[0].timestamp, ts(3));
        assert_eq!(series.len(), 5);
    }
}

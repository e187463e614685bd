//! Candle sources: where the orchestrator loads series from.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use candlesig_core::domain::{Candle, CandleSeries, SeriesError, Timeframe};

/// What to load for one (symbol, timeframe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Candles the caller needs. Sources report a shorter history as
    /// [`SourceError::DataUnavailable`] carrying the count they hold.
    pub min_count: usize,
    /// Most recent candles to return.
    pub limit: usize,
}

impl SeriesRequest {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, min_count: usize, limit: usize) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            min_count,
            limit,
        }
    }

    pub(crate) fn unavailable(&self, available: usize) -> SourceError {
        SourceError::DataUnavailable {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            available,
            required: self.min_count,
        }
    }

    /// Cut a full series down to `limit` and enforce `min_count` on the result.
    pub(crate) fn fit(&self, series: CandleSeries) -> Result<CandleSeries, SourceError> {
        let series = series.tail(self.limit);
        if series.len() < self.min_count {
            return Err(self.unavailable(series.len()));
        }
        Ok(series)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{symbol}/{timeframe} has {available} candles, {required} required")]
    DataUnavailable {
        symbol: String,
        timeframe: Timeframe,
        available: usize,
        required: usize,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed candle file {path}: {reason}")]
    Format { path: String, reason: String },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Read side of the candle store.
pub trait CandleSource: Send + Sync {
    /// Load the most recent `request.limit` candles, oldest first. Fewer than
    /// `request.min_count` candles is [`SourceError::DataUnavailable`].
    fn load_series(&self, request: &SeriesRequest) -> Result<CandleSeries, SourceError>;
}

/// In-memory source keyed by (symbol, timeframe).
#[derive(Debug, Default)]
pub struct MemorySource {
    candles: RwLock<HashMap<(String, Timeframe), Vec<Candle>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the candles held for one (symbol, timeframe).
    pub fn insert(&self, symbol: impl Into<String>, timeframe: Timeframe, candles: Vec<Candle>) {
        let mut map = self.candles.write().unwrap_or_else(|e| e.into_inner());
        map.insert((symbol.into(), timeframe), candles);
    }

    /// Builder form of [`MemorySource::insert`] taking a canonical series.
    pub fn with_series(self, series: &CandleSeries) -> Self {
        self.insert(series.symbol(), series.timeframe(), series.candles().to_vec());
        self
    }

    /// Symbols with at least one stored timeframe, sorted.
    pub fn symbols(&self) -> Vec<String> {
        let map = self.candles.read().unwrap_or_else(|e| e.into_inner());
        let mut symbols: Vec<String> = map.keys().map(|(s, _)| s.clone()).collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

impl CandleSource for MemorySource {
    fn load_series(&self, request: &SeriesRequest) -> Result<CandleSeries, SourceError> {
        let map = self.candles.read().unwrap_or_else(|e| e.into_inner());
        let raw = map
            .get(&(request.symbol.clone(), request.timeframe))
            .filter(|c| !c.is_empty())
            .ok_or_else(|| request.unavailable(0))?;
        let series = CandleSeries::new(request.symbol.clone(), request.timeframe, raw.clone())?;
        request.fit(series)
    }
}

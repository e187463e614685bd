//! CSV candle files laid out as `<root>/<SYMBOL>/<timeframe>.csv`.
//!
//! Header: `timestamp,open,high,low,close,volume`. Timestamps are RFC 3339
//! or integer epoch milliseconds (exchange kline export format).

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use candlesig_core::domain::{Candle, CandleSeries, Timeframe};

use crate::source::{CandleSource, SeriesRequest, SourceError};

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    root: PathBuf,
}

impl CsvSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.root.join(symbol).join(format!("{}.csv", timeframe.as_str()))
    }

    /// Symbol directories under the root, sorted.
    pub fn symbols(&self) -> Result<Vec<String>, SourceError> {
        let entries = std::fs::read_dir(&self.root).map_err(|source| SourceError::Io {
            path: self.root.display().to_string(),
            source,
        })?;
        let mut symbols: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    /// Write a series in the layout this source reads. Used to seed demo data.
    pub fn write_series(&self, series: &CandleSeries) -> Result<PathBuf, SourceError> {
        let path = self.path_for(series.symbol(), series.timeframe());
        let io_err = |source| SourceError::Io {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut writer = csv::Writer::from_path(&path).map_err(|e| format_err(&path, e))?;
        writer
            .write_record(["timestamp", "open", "high", "low", "close", "volume"])
            .map_err(|e| format_err(&path, e))?;
        for c in series.candles() {
            writer
                .write_record([
                    c.timestamp.to_rfc3339(),
                    c.open.to_string(),
                    c.high.to_string(),
                    c.low.to_string(),
                    c.close.to_string(),
                    c.volume.to_string(),
                ])
                .map_err(|e| format_err(&path, e))?;
        }
        writer.flush().map_err(io_err)?;
        Ok(path)
    }
}

fn format_err(path: &Path, err: csv::Error) -> SourceError {
    SourceError::Format {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ms) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(ms).single();
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl CandleSource for CsvSource {
    fn load_series(&self, request: &SeriesRequest) -> Result<CandleSeries, SourceError> {
        let path = self.path_for(&request.symbol, request.timeframe);
        if !path.exists() {
            return Err(request.unavailable(0));
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| format_err(&path, e))?;
        let mut candles = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| format_err(&path, e))?;
            let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| SourceError::Format {
                path: path.display().to_string(),
                reason: format!("row {}: bad timestamp '{}'", line + 1, row.timestamp),
            })?;
            candles.push(Candle {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        if candles.is_empty() {
            return Err(request.unavailable(0));
        }

        let series = CandleSeries::new(request.symbol.clone(), request.timeframe, candles)?;
        request.fit(series)
    }
}

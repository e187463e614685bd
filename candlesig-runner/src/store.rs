//! Signal stores: the write side of the engine.
//!
//! Stores are the serialization point between concurrent evaluations of the
//! same pair. `persist_signal` re-checks the cooldown under the store's own
//! lock and rejects a conflicting write.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use candlesig_core::domain::{Signal, SignalId, Timeframe, SIGNAL_SOURCE};

pub const DEFAULT_COOLDOWN_HOURS: i64 = 4;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("signal for {symbol}/{timeframe} already emitted {age} ago")]
    CooldownConflict {
        symbol: String,
        timeframe: Timeframe,
        age: Duration,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SignalStore: Send + Sync {
    /// Age at `now` of the newest engine signal for the pair, if any.
    fn latest_signal_age(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Option<Duration>, StoreError>;

    /// Persist a new signal and return its assigned id.
    fn persist_signal(&self, signal: &Signal) -> Result<SignalId, StoreError>;

    /// Most recent signals, newest first, optionally for one symbol.
    fn recent_signals(&self, symbol: Option<&str>, limit: usize) -> Result<Vec<Signal>, StoreError>;
}

/// Newest engine signal for the pair among `signals`.
pub(crate) fn latest_for<'a>(
    signals: impl IntoIterator<Item = &'a Signal>,
    symbol: &str,
    timeframe: Timeframe,
) -> Option<&'a Signal> {
    signals
        .into_iter()
        .filter(|s| s.symbol == symbol && s.timeframe == timeframe && s.source == SIGNAL_SOURCE)
        .max_by_key(|s| s.created_at)
}

/// Write-time cooldown check for `signal` against the stored history.
pub(crate) fn check_cooldown<'a>(
    existing: impl IntoIterator<Item = &'a Signal>,
    signal: &Signal,
    cooldown: Duration,
) -> Result<(), StoreError> {
    if let Some(latest) = latest_for(existing, &signal.symbol, signal.timeframe) {
        let age = signal.created_at - latest.created_at;
        if age < cooldown {
            return Err(StoreError::CooldownConflict {
                symbol: signal.symbol.clone(),
                timeframe: signal.timeframe,
                age,
            });
        }
    }
    Ok(())
}

/// Newest-first ordering shared by the store implementations.
pub(crate) fn newest_first(mut signals: Vec<Signal>, symbol: Option<&str>, limit: usize) -> Vec<Signal> {
    if let Some(symbol) = symbol {
        signals.retain(|s| s.symbol == symbol);
    }
    signals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    signals.truncate(limit);
    signals
}

/// In-memory store; ids are assigned sequentially from 1.
#[derive(Debug)]
pub struct MemoryStore {
    cooldown: Duration,
    signals: Mutex<Vec<Signal>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_COOLDOWN_HOURS))
    }
}

impl MemoryStore {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            signals: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored signals.
    pub fn len(&self) -> usize {
        self.signals.lock().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SignalStore for MemoryStore {
    fn latest_signal_age(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Option<Duration>, StoreError> {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        Ok(latest_for(signals.iter(), symbol, timeframe).map(|s| now - s.created_at))
    }

    fn persist_signal(&self, signal: &Signal) -> Result<SignalId, StoreError> {
        let mut signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        check_cooldown(signals.iter(), signal, self.cooldown)?;

        let id = SignalId(signals.len() as u64 + 1);
        let mut stored = signal.clone();
        stored.id = Some(id);
        signals.push(stored);
        Ok(id)
    }

    fn recent_signals(&self, symbol: Option<&str>, limit: usize) -> Result<Vec<Signal>, StoreError> {
        let signals = self.signals.lock().unwrap_or_else(|e| e.into_inner());
        Ok(newest_first(signals.clone(), symbol, limit))
    }
}

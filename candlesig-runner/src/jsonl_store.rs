//! Append-only JSONL signal store.
//!
//! One JSON signal per line. Malformed lines are skipped on read. A torn
//! trailing line (no closing newline) is terminated before the next append,
//! so it is the only line lost.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use candlesig_core::domain::{Signal, SignalId, Timeframe};

use crate::store::{
    check_cooldown, latest_for, newest_first, SignalStore, StoreError, DEFAULT_COOLDOWN_HOURS,
};

pub struct JsonlStore {
    path: PathBuf,
    cooldown: Duration,
    /// Held across read-check-append so concurrent writers see each other.
    write_lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_cooldown(path, Duration::hours(DEFAULT_COOLDOWN_HOURS))
    }

    pub fn with_cooldown(path: impl Into<PathBuf>, cooldown: Duration) -> Self {
        Self {
            path: path.into(),
            cooldown,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Read every well-formed signal in file order.
    pub fn read_all(&self) -> Result<Vec<Signal>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path).map_err(|e| self.io_err(e))?;
        let reader = io::BufReader::new(file);
        let mut signals = Vec::new();

        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| self.io_err(e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Signal>(&line) {
                Ok(signal) => signals.push(signal),
                Err(err) => warn!(path = %self.path.display(), line = n + 1, %err, "skipping malformed signal line"),
            }
        }

        Ok(signals)
    }
}

/// True when the file is non-empty and its last byte is not a newline.
fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl SignalStore for JsonlStore {
    fn latest_signal_age(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Option<Duration>, StoreError> {
        let signals = self.read_all()?;
        Ok(latest_for(signals.iter(), symbol, timeframe).map(|s| now - s.created_at))
    }

    fn persist_signal(&self, signal: &Signal) -> Result<SignalId, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let existing = self.read_all()?;
        check_cooldown(existing.iter(), signal, self.cooldown)?;

        let id = SignalId(existing.iter().filter_map(|s| s.id).map(|id| id.0).max().unwrap_or(0) + 1);
        let mut stored = signal.clone();
        stored.id = Some(id);
        let json = serde_json::to_string(&stored)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        if ends_mid_line(&mut file).map_err(|e| self.io_err(e))? {
            warn!(path = %self.path.display(), "terminating torn trailing line");
            file.write_all(b"\n").map_err(|e| self.io_err(e))?;
        }
        writeln!(file, "{json}").map_err(|e| self.io_err(e))?;
        file.flush().map_err(|e| self.io_err(e))?;

        Ok(id)
    }

    fn recent_signals(&self, symbol: Option<&str>, limit: usize) -> Result<Vec<Signal>, StoreError> {
        Ok(newest_first(self.read_all()?, symbol, limit))
    }
}

//! Per-pair evaluation: cooldown → load → compute → persist.
//!
//! The read phase (cooldown check, series loads) and the write phase
//! (persist) are separate calls on the collaborator traits. Everything in
//! between is the pure pipeline from `candlesig-core`.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use candlesig_core::domain::{CandleSeries, Direction, Signal, Timeframe};
use candlesig_core::fingerprint::series_fingerprint;
use candlesig_core::{analyze, apply_confluence, confirming_direction, MIN_HTF_CANDLES};

use crate::config::EngineConfig;
use crate::source::{CandleSource, SeriesRequest, SourceError};
use crate::store::{SignalStore, StoreError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// What one evaluation of a pair did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A signal for the pair is younger than the cooldown.
    CooldownActive { age: Duration },
    /// Fewer working candles than required.
    InsufficientData { available: usize, required: usize },
    /// Evaluated, nothing passed the thresholds.
    NoSignal,
    /// Persisted signals, ids assigned.
    Emitted(Vec<Signal>),
}

impl Outcome {
    pub fn signals(&self) -> &[Signal] {
        match self {
            Outcome::Emitted(signals) => signals,
            _ => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::CooldownActive { .. } => "cooldown_active",
            Outcome::InsufficientData { .. } => "insufficient_data",
            Outcome::NoSignal => "no_signal",
            Outcome::Emitted(_) => "emitted",
        }
    }
}

pub struct Orchestrator<'a> {
    source: &'a dyn CandleSource,
    store: &'a dyn SignalStore,
    config: EngineConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(source: &'a dyn CandleSource, store: &'a dyn SignalStore, config: EngineConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one (symbol, timeframe) at `now`.
    pub fn evaluate_pair(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Outcome, RunError> {
        // Read phase
        if let Some(age) = self.store.latest_signal_age(symbol, timeframe, now)? {
            if age < self.config.cooldown() {
                debug!(symbol, timeframe = %timeframe, age_minutes = age.num_minutes(), "signal_cooldown_active");
                return Ok(Outcome::CooldownActive { age });
            }
        }

        let engine = &self.config.engine;
        let request = SeriesRequest::new(symbol, timeframe, engine.min_candles, engine.history_limit);
        let series = match self.source.load_series(&request) {
            Ok(series) => series,
            Err(SourceError::DataUnavailable { available, .. }) => {
                return Ok(self.insufficient(symbol, timeframe, available));
            }
            Err(err) => return Err(err.into()),
        };
        log_rejections(&series);
        if series.len() < engine.min_candles {
            return Ok(self.insufficient(symbol, timeframe, series.len()));
        }

        let higher = match timeframe.higher() {
            Some(htf) => self.load_optional(&SeriesRequest::new(
                symbol,
                htf,
                MIN_HTF_CANDLES,
                engine.history_limit,
            ))?,
            None => None,
        };
        let adjacent = self.load_confluence(symbol, timeframe)?;

        // Compute phase
        let pipeline = self.config.pipeline();
        let analysis = analyze(&series, higher.as_ref(), &pipeline);
        if analysis.candidates.is_empty() {
            debug!(symbol, timeframe = %timeframe, bias = analysis.bias.value(), "no_signal");
            return Ok(Outcome::NoSignal);
        }

        let mut candidates = analysis.candidates;
        if self.config.confluence.enabled {
            let directions: Vec<Option<Direction>> = adjacent
                .iter()
                .map(|s| confirming_direction(s, analysis.bias, &pipeline, &self.config.confluence))
                .collect();
            for candidate in &mut candidates {
                if let Some(boost) = apply_confluence(candidate, &directions, &self.config.confluence) {
                    debug!(
                        symbol,
                        timeframe = %timeframe,
                        agreements = boost.agreements,
                        considered = boost.considered,
                        boost = boost.boost,
                        "mtf_confluence_boost"
                    );
                }
            }
        }

        // Write phase
        let dataset_hash = series_fingerprint(&series);
        let mut emitted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let mut signal = Signal::from_candidate(candidate, &analysis.levels, Some(&dataset_hash), now);
            match self.store.persist_signal(&signal) {
                Ok(id) => {
                    signal.id = Some(id);
                    info!(
                        symbol,
                        timeframe = %timeframe,
                        direction = %signal.direction,
                        confidence = signal.confidence,
                        entry = signal.entry,
                        signal_id = id.0,
                        "signal_generated"
                    );
                    emitted.push(signal);
                }
                Err(StoreError::CooldownConflict { age, .. }) => {
                    debug!(symbol, timeframe = %timeframe, age_minutes = age.num_minutes(), "signal_cooldown_active");
                    return Ok(Outcome::CooldownActive { age });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Outcome::Emitted(emitted))
    }

    /// Adjacent-timeframe series with enough data to vote. Empty when
    /// confluence is disabled.
    fn load_confluence(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<CandleSeries>, RunError> {
        let params = &self.config.confluence;
        if !params.enabled {
            return Ok(Vec::new());
        }
        let mut adjacent = Vec::new();
        for &tf in timeframe.confluence() {
            let request = SeriesRequest::new(symbol, tf, params.min_candles, params.limit);
            if let Some(series) = self.load_optional(&request)? {
                adjacent.push(series);
            }
        }
        Ok(adjacent)
    }

    /// Load a series, mapping "not enough data" to `None`.
    fn load_optional(&self, request: &SeriesRequest) -> Result<Option<CandleSeries>, RunError> {
        match self.source.load_series(request) {
            Ok(series) => Ok(Some(series)),
            Err(SourceError::DataUnavailable { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn insufficient(&self, symbol: &str, timeframe: Timeframe, available: usize) -> Outcome {
        let required = self.config.engine.min_candles;
        debug!(symbol, timeframe = %timeframe, candles = available, required, "insufficient_data");
        Outcome::InsufficientData {
            available,
            required,
        }
    }
}

fn log_rejections(series: &CandleSeries) {
    for rejected in series.rejected() {
        warn!(
            symbol = series.symbol(),
            timeframe = %series.timeframe(),
            timestamp = %rejected.timestamp,
            reason = %rejected.reason,
            "malformed_candles_dropped"
        );
    }
}

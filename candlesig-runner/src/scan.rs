//! Batch evaluation of symbols × timeframes.
//!
//! Pairs run in parallel on the rayon pool. A failing pair is recorded and
//! never aborts the others; the report lists pairs in input order.

use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{info, warn};

use candlesig_core::domain::{Signal, Timeframe};

use crate::orchestrator::{Orchestrator, Outcome};

/// A pair that was evaluated without emitting.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSkip {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub outcome: Outcome,
}

/// A pair whose evaluation returned an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFailure {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub emitted: Vec<Signal>,
    pub skipped: Vec<PairSkip>,
    pub failures: Vec<PairFailure>,
}

impl ScanReport {
    pub fn pairs(&self) -> usize {
        self.skipped.len() + self.failures.len() + self.emitted_pairs()
    }

    fn emitted_pairs(&self) -> usize {
        let mut pairs: Vec<(&str, Timeframe)> =
            self.emitted.iter().map(|s| (s.symbol.as_str(), s.timeframe)).collect();
        pairs.sort();
        pairs.dedup();
        pairs.len()
    }
}

/// Evaluate every (symbol, timeframe) pair at `now`.
pub fn scan(
    orchestrator: &Orchestrator<'_>,
    symbols: &[String],
    timeframes: &[Timeframe],
    now: DateTime<Utc>,
) -> ScanReport {
    let started = Instant::now();
    let pairs: Vec<(&str, Timeframe)> = symbols
        .iter()
        .flat_map(|s| timeframes.iter().map(move |tf| (s.as_str(), *tf)))
        .collect();

    let results: Vec<_> = pairs
        .par_iter()
        .map(|&(symbol, timeframe)| (symbol, timeframe, orchestrator.evaluate_pair(symbol, timeframe, now)))
        .collect();

    let mut report = ScanReport::default();
    for (symbol, timeframe, result) in results {
        match result {
            Ok(Outcome::Emitted(signals)) => report.emitted.extend(signals),
            Ok(outcome) => report.skipped.push(PairSkip {
                symbol: symbol.to_string(),
                timeframe,
                outcome,
            }),
            Err(err) => {
                warn!(symbol, timeframe = %timeframe, error = %err, "analyze_error");
                report.failures.push(PairFailure {
                    symbol: symbol.to_string(),
                    timeframe,
                    error: err.to_string(),
                });
            }
        }
    }

    info!(
        symbols = symbols.len(),
        pairs = pairs.len(),
        signals_generated = report.emitted.len(),
        skipped = report.skipped.len(),
        failures = report.failures.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan_complete"
    );
    report
}

//! candlesig core: domain types, indicators, levels, trend and signal evaluation.
//!
//! This crate contains the pure compute phase of the signal engine:
//! - Domain types (candles, series, timeframes, levels, signals)
//! - Indicator snapshot with `Option<f64>` warm-up semantics
//! - Swing-point support/resistance detection
//! - Higher-timeframe trend classification
//! - Rule-based long/short evaluation with stop/target/size planning
//! - Multi-timeframe confluence
//!
//! Nothing here performs I/O. Loading candles and persisting signals live in
//! `candlesig-runner`.

pub mod confluence;
pub mod domain;
pub mod evaluator;
pub mod fingerprint;
pub mod indicators;
pub mod levels;
pub mod numeric;
pub mod pipeline;
pub mod trend;

pub use confluence::{apply_confluence, confirming_direction, ConfluenceBoost, ConfluenceParams};
pub use evaluator::{EvaluatorParams, SignalEvaluator};
pub use levels::{detect_levels, LevelParams};
pub use pipeline::{analyze, analyze_with_bias, Analysis, PipelineParams};
pub use trend::{classify_trend, htf_bias, MIN_HTF_CANDLES};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything handed across scan worker threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::CandleSeries>();
        require_sync::<domain::CandleSeries>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::SignalCandidate>();
        require_sync::<domain::SignalCandidate>();
        require_send::<domain::Levels>();
        require_sync::<domain::Levels>();

        require_send::<indicators::IndicatorSnapshot>();
        require_sync::<indicators::IndicatorSnapshot>();
        require_send::<indicators::EnrichedSeries>();
        require_sync::<indicators::EnrichedSeries>();

        require_send::<SignalEvaluator>();
        require_sync::<SignalEvaluator>();
        require_send::<PipelineParams>();
        require_sync::<PipelineParams>();
        require_send::<Analysis>();
        require_sync::<Analysis>();
    }

    /// Architecture contract: the evaluator sees only the enriched series,
    /// levels and a bias. No store or source type can reach it.
    #[test]
    fn evaluator_signature_is_pure() {
        fn _check(
            evaluator: &SignalEvaluator,
            enriched: &indicators::EnrichedSeries,
            levels: &domain::Levels,
        ) -> Vec<domain::SignalCandidate> {
            evaluator.evaluate(enriched, levels, domain::TrendBias::Neutral)
        }
    }
}

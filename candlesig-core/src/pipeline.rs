//! The pure compute phase for one (symbol, timeframe) pair.
//!
//! candles → indicators → levels → (with bias) evaluator → candidates.
//! Nothing here performs I/O; callers load the series and persist the result.

use serde::{Deserialize, Serialize};

use crate::domain::{CandleSeries, Direction, Levels, SignalCandidate, TrendBias};
use crate::evaluator::{EvaluatorParams, SignalEvaluator};
use crate::indicators::{enrich, EnrichedSeries};
use crate::levels::{detect_levels, LevelParams};
use crate::trend::htf_bias;

/// Parameters for every stage of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    #[serde(default)]
    pub evaluator: EvaluatorParams,
    #[serde(default)]
    pub levels: LevelParams,
}

/// Everything the compute phase derived for one series.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub enriched: EnrichedSeries,
    pub levels: Levels,
    pub bias: TrendBias,
    pub candidates: Vec<SignalCandidate>,
}

impl Analysis {
    /// Direction of the emitted candidate, if any.
    pub fn direction(&self) -> Option<Direction> {
        self.candidates.first().map(|c| c.direction)
    }
}

/// Analyze `series`, classifying the bias from its higher-timeframe series.
pub fn analyze(
    series: &CandleSeries,
    higher: Option<&CandleSeries>,
    params: &PipelineParams,
) -> Analysis {
    analyze_with_bias(series, htf_bias(series.timeframe(), higher), params)
}

/// Analyze `series` under an already known bias.
pub fn analyze_with_bias(
    series: &CandleSeries,
    bias: TrendBias,
    params: &PipelineParams,
) -> Analysis {
    let enriched = enrich(series);
    let levels = detect_levels(series.candles(), &params.levels);
    let candidates = SignalEvaluator::new(params.evaluator).evaluate(&enriched, &levels, bias);
    Analysis {
        enriched,
        levels,
        bias,
        candidates,
    }
}

//! Multi-timeframe confluence.
//!
//! Adjacent timeframes are analyzed with the same pipeline under the working
//! timeframe's bias. Each one that emits in the candidate's direction raises
//! its confidence.

use serde::{Deserialize, Serialize};

use crate::domain::{CandleSeries, Direction, SignalCandidate, TrendBias};
use crate::evaluator::{clamp_confidence, MAX_CONFIDENCE};
use crate::numeric::round_dp;
use crate::pipeline::{analyze_with_bias, PipelineParams};

pub const CONFLUENCE_REASON: &str = "mtf_confluence";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfluenceParams {
    pub enabled: bool,
    /// Adjacent series shorter than this are ignored.
    pub min_candles: usize,
    /// Most recent candles loaded per adjacent series.
    pub limit: usize,
    pub boost_per_timeframe: f64,
    pub max_boost: f64,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        Self {
            enabled: true,
            min_candles: 50,
            limit: 100,
            boost_per_timeframe: 0.08,
            max_boost: 0.20,
        }
    }
}

/// Direction an adjacent series would emit, or `None` when it is too short
/// or emits nothing.
pub fn confirming_direction(
    series: &CandleSeries,
    bias: TrendBias,
    pipeline: &PipelineParams,
    params: &ConfluenceParams,
) -> Option<Direction> {
    if series.len() < params.min_candles {
        return None;
    }
    analyze_with_bias(series, bias, pipeline).direction()
}

/// Result of applying confluence to a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfluenceBoost {
    pub agreements: usize,
    pub considered: usize,
    pub boost: f64,
}

/// Boost `candidate` by the number of agreeing adjacent directions.
///
/// `directions` holds one entry per usable adjacent series. Returns the boost
/// applied, or `None` when nothing agreed.
pub fn apply_confluence(
    candidate: &mut SignalCandidate,
    directions: &[Option<Direction>],
    params: &ConfluenceParams,
) -> Option<ConfluenceBoost> {
    let agreements = directions
        .iter()
        .filter(|d| **d == Some(candidate.direction))
        .count();
    if agreements == 0 {
        return None;
    }

    let boost = round_dp(
        (agreements as f64 * params.boost_per_timeframe).min(params.max_boost),
        2,
    );
    candidate.confidence = clamp_confidence((candidate.confidence + boost).min(MAX_CONFIDENCE));
    candidate.reasons.push(CONFLUENCE_REASON.to_string());

    Some(ConfluenceBoost {
        agreements,
        considered: directions.len(),
        boost,
    })
}

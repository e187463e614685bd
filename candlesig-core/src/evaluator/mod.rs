//! Signal evaluation: enriched series + levels + higher-timeframe bias →
//! at most one candidate.
//!
//! Only the latest candle is evaluated. Long is tried first; short is tried
//! only when long yields nothing, so a single call never produces both.

pub mod risk;
pub mod rules;

pub use risk::{plan_exits, position_size_pct, ExitPlan};
pub use rules::{clamp_confidence, score, RuleInput, Score, MAX_CONFIDENCE};

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, Levels, SignalCandidate, TrendBias};
use crate::indicators::{Column, EnrichedSeries};
use crate::numeric::round_price;

/// Thresholds and risk parameters for the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorParams {
    /// Candidates below this confidence are dropped.
    pub min_confidence: f64,
    /// Fraction of capital risked per trade.
    pub risk_pct: f64,
    pub max_position_pct: f64,
    pub sl_atr_multiplier: f64,
    /// Buffer beyond a support/resistance stop, in ATRs.
    pub sl_buffer_atr: f64,
    pub tp_ratios: [f64; 3],
}

impl Default for EvaluatorParams {
    fn default() -> Self {
        Self {
            min_confidence: 0.55,
            risk_pct: 0.02,
            max_position_pct: 20.0,
            sl_atr_multiplier: 1.5,
            sl_buffer_atr: 0.25,
            tp_ratios: [1.5, 2.5, 4.0],
        }
    }
}

/// Rule-based long/short evaluator.
#[derive(Debug, Clone, Default)]
pub struct SignalEvaluator {
    params: EvaluatorParams,
}

impl SignalEvaluator {
    pub fn new(params: EvaluatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EvaluatorParams {
        &self.params
    }

    /// Evaluate the latest candle of `enriched`.
    ///
    /// Returns an empty vec when there are fewer than two candles, when ATR is
    /// undefined or not positive, or when neither direction reaches
    /// `min_confidence`.
    pub fn evaluate(
        &self,
        enriched: &EnrichedSeries,
        levels: &Levels,
        bias: TrendBias,
    ) -> Vec<SignalCandidate> {
        let candles = enriched.series.candles();
        let n = candles.len();
        if n < 2 || enriched.indicators.len() != n {
            return Vec::new();
        }

        let last = n - 1;
        let row = enriched.indicators.row(last);
        let atr = match row.get(Column::Atr14) {
            Some(atr) if atr > 0.0 => atr,
            _ => return Vec::new(),
        };

        let close = candles[last].close;
        let input = RuleInput {
            row: &row,
            close,
            prev_hist: enriched.indicators.get(Column::MacdHist, last - 1),
            bias,
        };

        for direction in [Direction::Long, Direction::Short] {
            let Some(scored) = score(direction, &input) else {
                continue;
            };
            if scored.confidence < self.params.min_confidence {
                continue;
            }

            let entry = round_price(close);
            let level = match direction {
                Direction::Long => levels.nearest_support(entry),
                Direction::Short => levels.nearest_resistance(entry),
            };
            let plan = plan_exits(direction, entry, atr, level, &self.params);
            let [tp1, tp2, tp3] = plan.take_profits;

            return vec![SignalCandidate {
                symbol: enriched.series.symbol().to_string(),
                timeframe: enriched.series.timeframe(),
                direction,
                confidence: scored.confidence,
                entry,
                stop_loss: plan.stop_loss,
                take_profit_1: tp1,
                take_profit_2: tp2,
                take_profit_3: tp3,
                risk_reward: plan.risk_reward,
                position_size_pct: position_size_pct(entry, plan.stop_loss, &self.params),
                indicators: row.to_summary(),
                reasons: scored.reasons,
            }];
        }

        Vec::new()
    }
}

//! Gating and confidence scoring for one direction.
//!
//! Rules read only the latest snapshot row (plus the previous MACD histogram
//! for the cross rule). An undefined input never fires its rule.

use crate::domain::{Direction, TrendBias};
use crate::indicators::{Column, IndicatorRow};
use crate::numeric::round_dp;

pub const BASE_CONFIDENCE: f64 = 0.50;
pub const MAX_CONFIDENCE: f64 = 0.90;

const RSI_ZONE_BONUS: f64 = 0.10;
const RSI_EXTREME_PENALTY: f64 = 0.10;
const MACD_SIGN_BONUS: f64 = 0.10;
const MACD_CROSS_BONUS: f64 = 0.10;
const VOLUME_BONUS: f64 = 0.10;
const BB_MIDDLE_BONUS: f64 = 0.05;
const STOCH_RSI_BONUS: f64 = 0.05;
const HTF_ALIGNED_BONUS: f64 = 0.10;
const HTF_CONFLICT_PENALTY: f64 = 0.15;

/// Inputs the rules need from the evaluated candle.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub row: &'a IndicatorRow,
    pub close: f64,
    pub prev_hist: Option<f64>,
    pub bias: TrendBias,
}

/// Outcome of scoring a direction that passed its gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Clamped to [0, MAX_CONFIDENCE] and rounded to two decimals.
    pub confidence: f64,
    pub reasons: Vec<String>,
}

/// Trend gate: EMA21/EMA50 ordering must agree with `direction`, and price
/// must sit on the same side of EMA200 when EMA200 is defined.
pub fn passes_gate(direction: Direction, input: &RuleInput<'_>) -> bool {
    let want = direction.sign();
    if input.row.get(Column::EmaTrend) != Some(want) {
        return false;
    }
    match input.row.get(Column::Ema200) {
        Some(ema200) => (input.close - ema200) * want > 0.0,
        None => true,
    }
}

/// Score `direction`, or `None` if the gate rejects it.
pub fn score(direction: Direction, input: &RuleInput<'_>) -> Option<Score> {
    if !passes_gate(direction, input) {
        return None;
    }

    let long = direction == Direction::Long;
    let row = input.row;
    let mut confidence = BASE_CONFIDENCE;
    let mut reasons = vec![if long { "ema_21 > ema_50" } else { "ema_21 < ema_50" }.to_string()];
    let mut fire = |name: &str, delta: f64| {
        confidence += delta;
        reasons.push(name.to_string());
    };

    if let Some(rsi) = row.get(Column::Rsi14) {
        let (zone, extreme) = if long {
            ((30.0..=50.0).contains(&rsi), rsi > 70.0)
        } else {
            ((50.0..=70.0).contains(&rsi), rsi < 30.0)
        };
        if zone {
            fire(if long { "rsi_pullback" } else { "rsi_bounce" }, RSI_ZONE_BONUS);
        }
        if extreme {
            fire(
                if long { "rsi_overbought" } else { "rsi_oversold" },
                -RSI_EXTREME_PENALTY,
            );
        }
    }

    if let Some(hist) = row.get(Column::MacdHist) {
        let signed = hist * direction.sign();
        if signed > 0.0 {
            fire(if long { "macd_bullish" } else { "macd_bearish" }, MACD_SIGN_BONUS);
        }
        let crossed = input
            .prev_hist
            .is_some_and(|prev| prev * direction.sign() <= 0.0 && signed > 0.0);
        if crossed {
            fire(
                if long { "macd_cross_up" } else { "macd_cross_down" },
                MACD_CROSS_BONUS,
            );
        }
    }

    if row.get(Column::VolRatio).is_some_and(|r| r > 1.0) {
        fire("volume_above_avg", VOLUME_BONUS);
    }

    if let Some(middle) = row.get(Column::BbMiddle) {
        if long && input.close < middle {
            fire("price_below_bb_middle", BB_MIDDLE_BONUS);
        } else if !long && input.close > middle {
            fire("price_above_bb_middle", BB_MIDDLE_BONUS);
        }
    }

    if let (Some(k), Some(d)) = (row.get(Column::StochRsiK), row.get(Column::StochRsiD)) {
        if long && k > d {
            fire("stochrsi_bullish", STOCH_RSI_BONUS);
        } else if !long && k < d {
            fire("stochrsi_bearish", STOCH_RSI_BONUS);
        }
    }

    let aligned = TrendBias::aligned_with(direction);
    if input.bias == aligned {
        fire("htf_trend_aligned", HTF_ALIGNED_BONUS);
    } else if input.bias != TrendBias::Neutral {
        fire("htf_trend_conflict", -HTF_CONFLICT_PENALTY);
    }

    Some(Score {
        confidence: clamp_confidence(confidence),
        reasons,
    })
}

/// Clamp to [0, MAX_CONFIDENCE] and round to two decimals.
pub fn clamp_confidence(value: f64) -> f64 {
    round_dp(value.clamp(0.0, MAX_CONFIDENCE), 2)
}

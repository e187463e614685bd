//! Stop-loss, take-profit and position sizing.
//!
//! # Formula
//! ```text
//! atr_stop      = entry -/+ sl_atr_multiplier * ATR
//! stop_loss     = level -/+ sl_buffer_atr * ATR   if the level is tighter than atr_stop
//! risk          = |entry - stop_loss|
//! take_profit_i = entry +/- tp_ratio_i * risk
//! size_pct      = min(max_position_pct, risk_pct / (risk / entry) * 100)
//! ```

use crate::domain::Direction;
use crate::numeric::{round_dp, round_price};

use super::EvaluatorParams;

/// Exit prices for one candidate, rounded to price precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitPlan {
    pub stop_loss: f64,
    pub take_profits: [f64; 3],
    pub risk_reward: f64,
}

/// Place the stop and targets for an entry.
///
/// `level` is the nearest support below entry (long) or nearest resistance
/// above entry (short).
pub fn plan_exits(
    direction: Direction,
    entry: f64,
    atr: f64,
    level: Option<f64>,
    params: &EvaluatorParams,
) -> ExitPlan {
    let side = direction.sign();
    let atr_stop = entry - side * params.sl_atr_multiplier * atr;
    let stop = match level {
        // Level sits between the ATR stop and the entry
        Some(level) if (level - atr_stop) * side > 0.0 => level - side * params.sl_buffer_atr * atr,
        _ => atr_stop,
    };
    let risk = (entry - stop).abs();
    let take_profits = params
        .tp_ratios
        .map(|ratio| round_price(entry + side * ratio * risk));

    ExitPlan {
        stop_loss: round_price(stop),
        take_profits,
        risk_reward: params.tp_ratios[0],
    }
}

/// Percent of capital to allocate, capped at `max_position_pct`, one decimal.
pub fn position_size_pct(entry: f64, stop_loss: f64, params: &EvaluatorParams) -> f64 {
    if entry <= 0.0 {
        return 0.0;
    }
    let risk_per_unit = (entry - stop_loss).abs() / entry;
    if risk_per_unit <= 0.0 {
        return 0.0;
    }
    let size = params.risk_pct / risk_per_unit * 100.0;
    round_dp(size.min(params.max_position_pct), 1)
}

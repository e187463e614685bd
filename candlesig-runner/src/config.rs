//! Engine configuration loaded from TOML.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields the reference engine parameters.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use candlesig_core::domain::Timeframe;
use candlesig_core::{ConfluenceParams, EvaluatorParams, LevelParams, PipelineParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Orchestration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Working-timeframe candles required before evaluation.
    pub min_candles: usize,
    /// Most recent candles loaded for the working and higher timeframe.
    pub history_limit: usize,
    /// Minimum hours between two signals for one (symbol, timeframe).
    pub cooldown_hours: i64,
    /// Timeframes scanned when none are given explicitly.
    pub entry_timeframes: Vec<Timeframe>,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            min_candles: 210,
            history_limit: 500,
            cooldown_hours: 4,
            entry_timeframes: Timeframe::ENTRY.to_vec(),
        }
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub evaluator: EvaluatorParams,
    pub levels: LevelParams,
    pub confluence: ConfluenceParams,
}

impl EngineConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let engine = &self.engine;
        if engine.min_candles < 2 {
            return Err(invalid("engine.min_candles", "must be at least 2"));
        }
        if engine.history_limit < engine.min_candles {
            return Err(invalid(
                "engine.history_limit",
                format!("must be >= min_candles ({})", engine.min_candles),
            ));
        }
        if engine.cooldown_hours < 0 {
            return Err(invalid("engine.cooldown_hours", "must not be negative"));
        }
        if engine.entry_timeframes.is_empty() {
            return Err(invalid("engine.entry_timeframes", "must not be empty"));
        }

        let ev = &self.evaluator;
        if !(0.0..=1.0).contains(&ev.min_confidence) {
            return Err(invalid("evaluator.min_confidence", "must be within [0, 1]"));
        }
        if !(ev.risk_pct > 0.0 && ev.risk_pct < 1.0) {
            return Err(invalid("evaluator.risk_pct", "must be within (0, 1)"));
        }
        if !(ev.max_position_pct > 0.0 && ev.max_position_pct <= 100.0) {
            return Err(invalid("evaluator.max_position_pct", "must be within (0, 100]"));
        }
        if ev.sl_atr_multiplier <= 0.0 {
            return Err(invalid("evaluator.sl_atr_multiplier", "must be positive"));
        }
        if ev.sl_buffer_atr < 0.0 {
            return Err(invalid("evaluator.sl_buffer_atr", "must not be negative"));
        }
        let [r1, r2, r3] = ev.tp_ratios;
        if !(r1 > 0.0 && r1 < r2 && r2 < r3) {
            return Err(invalid(
                "evaluator.tp_ratios",
                "must be positive and strictly increasing",
            ));
        }

        let lv = &self.levels;
        if lv.window == 0 {
            return Err(invalid("levels.window", "must be at least 1"));
        }
        if lv.tolerance_pct < 0.0 {
            return Err(invalid("levels.tolerance_pct", "must not be negative"));
        }
        if lv.max_levels == 0 {
            return Err(invalid("levels.max_levels", "must be at least 1"));
        }

        let cf = &self.confluence;
        if cf.limit < cf.min_candles {
            return Err(invalid("confluence.limit", "must be >= confluence.min_candles"));
        }
        if cf.boost_per_timeframe < 0.0 || cf.max_boost < 0.0 {
            return Err(invalid("confluence.max_boost", "boosts must not be negative"));
        }

        Ok(())
    }

    pub fn pipeline(&self) -> PipelineParams {
        PipelineParams {
            evaluator: self.evaluator,
            levels: self.levels,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::hours(self.engine.cooldown_hours)
    }
}

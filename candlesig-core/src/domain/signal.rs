//! Signal candidates produced by the evaluator and the records persisted from them.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{DatasetHash, Levels, SignalId, Timeframe};

/// Value written to [`Signal::source`] for every record this engine creates.
pub const SIGNAL_SOURCE: &str = "technical_analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Higher-timeframe directional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    Bearish,
    #[default]
    Neutral,
    Bullish,
}

impl TrendBias {
    /// -1, 0 or +1.
    pub fn value(self) -> i8 {
        match self {
            TrendBias::Bearish => -1,
            TrendBias::Neutral => 0,
            TrendBias::Bullish => 1,
        }
    }

    /// Bias that agrees with `direction`.
    pub fn aligned_with(direction: Direction) -> Self {
        match direction {
            Direction::Long => TrendBias::Bullish,
            Direction::Short => TrendBias::Bearish,
        }
    }
}

/// In-memory signal before persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub confidence: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub risk_reward: f64,
    pub position_size_pct: f64,
    /// Defined indicator values on the evaluated candle, keyed by column name.
    pub indicators: BTreeMap<String, f64>,
    /// Triggered rule names in evaluation order.
    pub reasons: Vec<String>,
}

impl SignalCandidate {
    pub fn take_profits(&self) -> [f64; 3] {
        [self.take_profit_1, self.take_profit_2, self.take_profit_3]
    }
}

/// Lifecycle status. The engine only ever writes `New`; other transitions
/// belong to the monitoring process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    #[default]
    New,
    Active,
    Closed,
    Expired,
    Cancelled,
}

/// Persisted signal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Assigned by the store; `None` until persisted.
    pub id: Option<SignalId>,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub confidence: f64,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub take_profit_3: f64,
    pub risk_reward: f64,
    pub position_size_pct: f64,
    pub source: String,
    pub status: SignalStatus,
    /// Indicator snapshot plus `levels`, `reasons` and `dataset_hash`.
    pub indicators: Value,
    pub reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Signal {
    /// Build a `new` record from a candidate evaluated at `created_at`.
    pub fn from_candidate(
        candidate: SignalCandidate,
        levels: &Levels,
        dataset_hash: Option<&DatasetHash>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut snapshot = serde_json::Map::new();
        for (name, value) in &candidate.indicators {
            snapshot.insert(name.clone(), json!(value));
        }
        snapshot.insert("levels".into(), levels.summary());
        snapshot.insert("reasons".into(), json!(candidate.reasons));
        if let Some(hash) = dataset_hash {
            snapshot.insert("dataset_hash".into(), json!(hash.as_str()));
        }

        Self {
            id: None,
            expires_at: created_at + candidate.timeframe.signal_expiry(),
            symbol: candidate.symbol,
            timeframe: candidate.timeframe,
            direction: candidate.direction,
            confidence: candidate.confidence,
            entry: candidate.entry,
            stop_loss: candidate.stop_loss,
            take_profit_1: candidate.take_profit_1,
            take_profit_2: candidate.take_profit_2,
            take_profit_3: candidate.take_profit_3,
            risk_reward: candidate.risk_reward,
            position_size_pct: candidate.position_size_pct,
            source: SIGNAL_SOURCE.to_string(),
            status: SignalStatus::New,
            indicators: Value::Object(snapshot),
            reasons: candidate.reasons,
            created_at,
            closed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, LevelKind};
    use chrono::{Duration, TimeZone};

    fn candidate() -> SignalCandidate {
        let mut indicators = BTreeMap::new();
        indicators.insert("ema_9".to_string(), 101.5);
        indicators.insert("rsi_14".to_string(), 45.0);
        SignalCandidate {
            symbol: "BTCUSDT".into(),
            timeframe: Timeframe::H1,
            direction: Direction::Long,
            confidence: 0.7,
            entry: 100.0,
            stop_loss: 97.0,
            take_profit_1: 104.5,
            take_profit_2: 107.5,
            take_profit_3: 112.0,
            risk_reward: 1.5,
            position_size_pct: 20.0,
            indicators,
            reasons: vec!["ema_21 > ema_50".into(), "macd_bullish".into()],
        }
    }

    #[test]
    fn from_candidate_sets_lifecycle_fields() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let signal = Signal::from_candidate(candidate(), &Levels::default(), None, created);

        assert_eq!(signal.id, None);
        assert_eq!(signal.status, SignalStatus::New);
        assert_eq!(signal.source, SIGNAL_SOURCE);
        assert_eq!(signal.expires_at, created + Duration::hours(12));
        assert!(signal.closed_at.is_none());
    }

    #[test]
    fn snapshot_embeds_levels_and_reasons() {
        let levels = Levels {
            support: vec![Level {
                price: 95.0,
                kind: LevelKind::Support,
                touches: 3,
                last_touch: 10,
            }],
            resistance: vec![],
        };
        let hash = DatasetHash("ab".repeat(32));
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let signal = Signal::from_candidate(candidate(), &levels, Some(&hash), created);

        assert_eq!(signal.indicators["ema_9"], 101.5);
        assert_eq!(signal.indicators["levels"]["support"][0]["touches"], 3);
        assert_eq!(signal.indicators["reasons"][1], "macd_bullish");
        assert_eq!(signal.indicators["dataset_hash"], hash.as_str());
    }

    #[test]
    fn direction_and_bias_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Short).unwrap(), "\"short\"");
        assert_eq!(serde_json::to_string(&SignalStatus::New).unwrap(), "\"new\"");
        assert_eq!(TrendBias::Bearish.value(), -1);
        assert_eq!(TrendBias::aligned_with(Direction::Long), TrendBias::Bullish);
    }
}

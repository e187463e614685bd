//! Support / resistance levels.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A clustered price level.
///
/// `last_touch` is the candle index of the most recent swing point in the
/// cluster; it only breaks ranking ties and is not part of the public summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub price: f64,
    pub kind: LevelKind,
    pub touches: usize,
    pub last_touch: usize,
}

/// Ranked support and resistance levels for one series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
}

impl Levels {
    /// Highest support strictly below `price`.
    pub fn nearest_support(&self, price: f64) -> Option<f64> {
        self.support
            .iter()
            .map(|l| l.price)
            .filter(|&p| p < price)
            .max_by(f64::total_cmp)
    }

    /// Lowest resistance strictly above `price`.
    pub fn nearest_resistance(&self, price: f64) -> Option<f64> {
        self.resistance
            .iter()
            .map(|l| l.price)
            .filter(|&p| p > price)
            .min_by(f64::total_cmp)
    }

    /// `{"support": [{"price", "touches"}], "resistance": [...]}`
    pub fn summary(&self) -> Value {
        let list = |levels: &[Level]| -> Vec<Value> {
            levels
                .iter()
                .map(|l| json!({ "price": l.price, "touches": l.touches }))
                .collect()
        };
        json!({
            "support": list(&self.support),
            "resistance": list(&self.resistance),
        })
    }
}

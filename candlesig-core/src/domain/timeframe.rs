//! Candle timeframes and the static lookup tables keyed on them.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported candle intervals, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
    #[serde(rename = "1d")]
    D1,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown timeframe '{0}' (expected one of 5m, 15m, 1h, 4h, 1d)")]
pub struct TimeframeParseError(pub String);

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// Timeframes signals are generated on by default.
    pub const ENTRY: [Timeframe; 3] = [Timeframe::M15, Timeframe::H1, Timeframe::H4];

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
            Timeframe::D1 => "1d",
        }
    }

    /// Length of one candle.
    pub fn duration(self) -> Duration {
        match self {
            Timeframe::M5 => Duration::minutes(5),
            Timeframe::M15 => Duration::minutes(15),
            Timeframe::H1 => Duration::hours(1),
            Timeframe::H4 => Duration::hours(4),
            Timeframe::D1 => Duration::days(1),
        }
    }

    /// Timeframe used for trend confirmation. `None` for the coarsest.
    pub fn higher(self) -> Option<Timeframe> {
        match self {
            Timeframe::M5 => Some(Timeframe::H1),
            Timeframe::M15 => Some(Timeframe::H4),
            Timeframe::H1 => Some(Timeframe::H4),
            Timeframe::H4 => Some(Timeframe::D1),
            Timeframe::D1 => None,
        }
    }

    /// How long a signal generated on this timeframe stays actionable.
    pub fn signal_expiry(self) -> Duration {
        match self {
            Timeframe::M5 => Duration::hours(1),
            Timeframe::M15 => Duration::hours(4),
            Timeframe::H1 => Duration::hours(12),
            Timeframe::H4 => Duration::hours(48),
            Timeframe::D1 => Duration::hours(168),
        }
    }

    /// Adjacent timeframes consulted for multi-timeframe confluence.
    pub fn confluence(self) -> &'static [Timeframe] {
        match self {
            Timeframe::M15 => &[Timeframe::H1, Timeframe::H4],
            Timeframe::H1 => &[Timeframe::H4],
            Timeframe::H4 => &[Timeframe::D1],
            Timeframe::M5 | Timeframe::D1 => &[],
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.as_str() == needle)
            .ok_or_else(|| TimeframeParseError(s.to_string()))
    }
}

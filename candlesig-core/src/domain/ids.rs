use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a signal by the store that persisted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalId(pub u64);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic dataset hash (BLAKE3 content hash of a candle series)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_hash_displays_hex() {
        let hash = DatasetHash("ab".repeat(32));
        assert_eq!(hash.as_str().len(), 64);
        assert_eq!(hash.to_string(), hash.as_str());
    }

    #[test]
    fn signal_id_display() {
        assert_eq!(SignalId(42).to_string(), "42");
    }
}

//! Screening request/result types
//!
//! A screening checks a supplier's legal name against external high-risk
//! entity lists. Results are constructed fresh per request from the upstream
//! response and are never persisted.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of screening sources understood by the upstream API.
///
/// The wire format is a small integer; unknown values are rejected at
/// conversion time rather than silently mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ScreeningSource {
    Sanctions,
    Debarment,
    OffshoreLeaks,
}

impl ScreeningSource {
    /// All valid sources, in wire order.
    pub const ALL: [Self; 3] = [Self::Sanctions, Self::Debarment, Self::OffshoreLeaks];

    pub fn as_u8(self) -> u8 {
        match self {
            Self::Sanctions => 1,
            Self::Debarment => 2,
            Self::OffshoreLeaks => 3,
        }
    }
}

impl TryFrom<u8> for ScreeningSource {
    type Error = UnknownSource;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sanctions),
            2 => Ok(Self::Debarment),
            3 => Ok(Self::OffshoreLeaks),
            other => Err(UnknownSource(other)),
        }
    }
}

impl From<ScreeningSource> for u8 {
    fn from(source: ScreeningSource) -> Self {
        source.as_u8()
    }
}

impl fmt::Display for ScreeningSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sanctions => write!(f, "sanctions"),
            Self::Debarment => write!(f, "debarment"),
            Self::OffshoreLeaks => write!(f, "offshore-leaks"),
        }
    }
}

/// Error for an out-of-range source identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown screening source id {0}, valid ids are 1-3")]
pub struct UnknownSource(pub u8);

/// A validated request to screen one entity name against selected sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRequest {
    pub supplier_id: Uuid,
    pub entity_name: String,
    /// Non-empty, pairwise distinct, at most three entries
    pub sources: Vec<ScreeningSource>,
}

/// A single match record returned by a screening source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hit {
    pub entity_name: String,
    /// Source identifier string as reported by the upstream API
    pub source: String,
    /// Source-specific attributes (aliases, list names, jurisdictions, ...)
    pub attributes: BTreeMap<String, String>,
    /// Match score 0-100; `None` means the source does not score matches
    pub match_score: Option<f64>,
}

/// Outcome of one screening call against the upstream API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub searched_entity: String,
    pub total_hits: u64,
    pub hits: Vec<Hit>,
    pub searched_at: DateTime<Utc>,
    pub execution_time: Duration,
    /// Non-fatal errors reported by individual upstream sources
    pub warnings: Vec<String>,
}

impl ScreeningResult {
    /// A supplier is high-risk exactly when at least one hit was returned.
    pub fn is_high_risk(&self) -> bool {
        self.total_hits > 0
    }
}

/// Caller-facing view assembled by the screening orchestration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub searched_entity: String,
    pub total_hits: u64,
    pub hits: Vec<Hit>,
    pub searched_at: DateTime<Utc>,
    pub execution_time: Duration,
    pub warnings: Vec<String>,
    pub is_high_risk: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_round_trip() {
        for source in ScreeningSource::ALL {
            assert_eq!(ScreeningSource::try_from(source.as_u8()), Ok(source));
        }
    }

    #[test]
    fn test_unknown_source_rejected() {
        assert_eq!(ScreeningSource::try_from(0), Err(UnknownSource(0)));
        assert_eq!(ScreeningSource::try_from(4), Err(UnknownSource(4)));
    }

    #[test]
    fn test_high_risk_derivation() {
        let mut result = ScreeningResult {
            searched_entity: "Acme Corp".to_string(),
            total_hits: 0,
            hits: vec![],
            searched_at: Utc::now(),
            execution_time: Duration::from_millis(420),
            warnings: vec![],
        };
        assert!(!result.is_high_risk());

        result.total_hits = 1;
        assert!(result.is_high_risk());
    }

    #[test]
    fn test_source_serde_uses_wire_integers() {
        let json = serde_json::to_string(&ScreeningSource::OffshoreLeaks).expect("serialize");
        assert_eq!(json, "3");
        let back: ScreeningSource = serde_json::from_str("1").expect("deserialize");
        assert_eq!(back, ScreeningSource::Sanctions);
        assert!(serde_json::from_str::<ScreeningSource>("9").is_err());
    }
}

//! Wire representations of the screening API
//!
//! The upstream API speaks camelCase JSON; these DTOs stay private to the
//! client and convert to the domain types at the boundary.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use procura_domain::{Hit, ScreeningRequest, ScreeningResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScreeningRequestBody {
    pub entity_name: String,
    /// Wire-format source ids (1-3)
    pub sources: Vec<u8>,
}

impl ScreeningRequestBody {
    pub fn from_request(request: &ScreeningRequest) -> Self {
        Self {
            entity_name: request.entity_name.clone(),
            sources: request.sources.iter().map(|s| s.as_u8()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScreeningResultBody {
    pub searched_entity: Option<String>,
    #[serde(default)]
    pub total_hits: u64,
    #[serde(default)]
    pub hits: Vec<HitBody>,
    pub searched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub execution_time_seconds: f64,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ScreeningResultBody {
    /// Convert to the domain result. Returns `None` when the body lacks the
    /// searched entity, which the upstream only omits on malformed replies.
    pub fn into_result(self) -> Option<ScreeningResult> {
        let searched_entity = self.searched_entity?;
        Some(ScreeningResult {
            searched_entity,
            total_hits: self.total_hits,
            hits: self.hits.into_iter().map(HitBody::into_hit).collect(),
            searched_at: self.searched_at.unwrap_or_else(Utc::now),
            execution_time: Duration::from_secs_f64(self.execution_time_seconds.max(0.0)),
            warnings: self.errors,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HitBody {
    pub entity_name: String,
    pub source: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub match_score: Option<f64>,
}

impl HitBody {
    fn into_hit(self) -> Hit {
        Hit {
            entity_name: self.entity_name,
            source: self.source,
            attributes: self.attributes,
            match_score: self.match_score,
        }
    }
}

/// Structured error body returned by the screening API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiErrorDetail {
    pub message: Option<String>,
    pub retry_after: Option<u64>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        self.errors.iter().find_map(|d| d.message.clone())
    }

    pub fn retry_after(&self) -> Option<u64> {
        self.errors.iter().find_map(|d| d.retry_after)
    }
}

//! Screening orchestration service

use std::sync::Arc;

use procura_common::validation::ValidationError;
use procura_domain::constants::MAX_SCREENING_SOURCES;
use procura_domain::{
    ScreeningError, ScreeningReport, ScreeningRequest, ScreeningResult, ScreeningSource, Supplier,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ports::{ScreeningGateway, SupplierStore};

/// Caller-facing failures of a screening run.
///
/// Lower-layer transport and auth errors never cross this boundary; they are
/// folded into [`ScreeningRunError::Rejected`] with a human-readable message.
#[derive(Debug, Error)]
pub enum ScreeningRunError {
    /// Input shape is invalid; every violated rule is enumerated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced supplier does not exist
    #[error("supplier {0} not found")]
    NotFound(Uuid),

    /// The screening request could not be completed
    #[error("screening request rejected: {0}")]
    Rejected(String),
}

/// Validate a raw source-id list into the closed source enum.
///
/// Rules (all checked, all violations reported):
/// - between 1 and 3 entries
/// - every id is a valid source (1-3)
/// - ids are pairwise distinct
pub fn validate_sources(raw: &[u8]) -> Result<Vec<ScreeningSource>, ValidationError> {
    let mut error = ValidationError::new();

    if raw.is_empty() || raw.len() > MAX_SCREENING_SOURCES {
        error.add(
            "sources",
            "sources.count",
            format!("between 1 and {MAX_SCREENING_SOURCES} sources required, got {}", raw.len()),
        );
    }

    let mut seen = Vec::with_capacity(raw.len());
    let mut duplicate_reported = false;
    let mut sources = Vec::with_capacity(raw.len());

    for &id in raw {
        match ScreeningSource::try_from(id) {
            Ok(source) => sources.push(source),
            Err(unknown) => {
                error.add("sources", "sources.unknown", unknown.to_string());
            }
        }
        if seen.contains(&id) {
            if !duplicate_reported {
                error.add("sources", "sources.duplicate", "source ids must be pairwise distinct");
                duplicate_reported = true;
            }
        } else {
            seen.push(id);
        }
    }

    error.into_result()?;
    Ok(sources)
}

/// Orchestrates a screening run end to end
pub struct ScreeningService {
    store: Arc<dyn SupplierStore>,
    gateway: Arc<dyn ScreeningGateway>,
}

impl ScreeningService {
    pub fn new(store: Arc<dyn SupplierStore>, gateway: Arc<dyn ScreeningGateway>) -> Self {
        Self { store, gateway }
    }

    /// Screen the supplier's legal name against the requested sources.
    ///
    /// Steps: validate the source list, resolve the supplier, invoke the
    /// gateway, then derive the high-risk flag from the hit count. The
    /// whole call is idempotent and safe to retry by the caller.
    pub async fn perform_screening(
        &self,
        supplier_id: Uuid,
        sources: &[u8],
    ) -> Result<ScreeningReport, ScreeningRunError> {
        let sources = validate_sources(sources)?;

        let supplier = self.resolve_supplier(supplier_id).await?;
        debug!(%supplier_id, supplier_name = %supplier.legal_name, "supplier resolved for screening");

        let request = ScreeningRequest {
            supplier_id,
            entity_name: supplier.legal_name.clone(),
            sources,
        };

        let result = match self.gateway.screen(&request).await {
            Ok(result) => result,
            Err(error) => return Err(Self::map_gateway_error(error)),
        };

        info!(
            %supplier_id,
            total_hits = result.total_hits,
            high_risk = result.is_high_risk(),
            "screening completed"
        );

        Ok(Self::assemble_report(&supplier, result))
    }

    async fn resolve_supplier(&self, supplier_id: Uuid) -> Result<Supplier, ScreeningRunError> {
        match self.store.get_by_id(supplier_id).await {
            Ok(Some(supplier)) => Ok(supplier),
            Ok(None) => Err(ScreeningRunError::NotFound(supplier_id)),
            Err(error) => {
                warn!(%supplier_id, error = %error, "supplier lookup failed");
                Err(ScreeningRunError::Rejected(format!("supplier lookup failed: {error}")))
            }
        }
    }

    fn map_gateway_error(error: ScreeningError) -> ScreeningRunError {
        if let ScreeningError::Api { status: 429, retry_after_secs, .. } = &error {
            let message = match retry_after_secs {
                Some(seconds) => format!(
                    "screening API rate limit exceeded, retry after {seconds} seconds"
                ),
                None => "screening API rate limit exceeded, retry later".to_string(),
            };
            return ScreeningRunError::Rejected(message);
        }
        ScreeningRunError::Rejected(error.to_string())
    }

    fn assemble_report(supplier: &Supplier, result: ScreeningResult) -> ScreeningReport {
        let is_high_risk = result.is_high_risk();
        ScreeningReport {
            supplier_id: supplier.id,
            supplier_name: supplier.legal_name.clone(),
            searched_entity: result.searched_entity,
            total_hits: result.total_hits,
            hits: result.hits,
            searched_at: result.searched_at,
            execution_time: result.execution_time,
            warnings: result.warnings,
            is_high_risk,
        }
    }
}

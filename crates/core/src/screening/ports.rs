//! Port interfaces consumed by the screening orchestration

use async_trait::async_trait;
use procura_domain::{Result, ScreeningError, ScreeningRequest, ScreeningResult, Supplier};
use uuid::Uuid;

/// Read-side supplier lookup used to resolve the name to screen
#[async_trait]
pub trait SupplierStore: Send + Sync {
    /// Fetch a supplier by id; `None` when the id is unknown.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Supplier>>;
}

/// Outbound gateway to the external screening API
///
/// Implementations own transport resilience (retry, circuit breaking,
/// authentication); the orchestration only sees the typed error surface.
#[async_trait]
pub trait ScreeningGateway: Send + Sync {
    /// Screen an entity name against the requested sources.
    async fn screen(&self, request: &ScreeningRequest)
        -> std::result::Result<ScreeningResult, ScreeningError>;

    /// Liveness probe of the screening API. Degrades every failure to
    /// `false`; this must never error.
    async fn health_check(&self) -> bool;
}

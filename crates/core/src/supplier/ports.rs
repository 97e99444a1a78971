//! Port interfaces for supplier persistence

use async_trait::async_trait;
use procura_domain::{Result, Supplier};
use uuid::Uuid;

/// Supplier persistence port.
///
/// `search` pushes the substring filter into the store: implementations must
/// match case-insensitively over legal name, trade name, tax id, and contact
/// email (see [`crate::supplier::query::matches_search`] for the reference
/// semantics).
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn insert(&self, supplier: Supplier) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<Supplier>>;

    /// Replace an existing record; errors when the id is unknown.
    async fn update(&self, supplier: Supplier) -> Result<()>;

    /// Delete by id; returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// All suppliers matching the optional search term, unordered.
    async fn search(&self, term: Option<&str>) -> Result<Vec<Supplier>>;
}

//! In-memory supplier store
//!
//! Backs both the CRUD repository and the screening lookup port with one
//! `RwLock`-guarded map. Suitable for tests and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use procura_core::{matches_search, SupplierRepository, SupplierStore};
use procura_domain::{ProcuraError, Result, Supplier};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe in-memory supplier store
#[derive(Default)]
pub struct InMemorySupplierStore {
    rows: RwLock<HashMap<Uuid, Supplier>>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl SupplierRepository for InMemorySupplierStore {
    async fn insert(&self, supplier: Supplier) -> Result<()> {
        self.rows.write().await.insert(supplier.id, supplier);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Supplier>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn update(&self, supplier: Supplier) -> Result<()> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&supplier.id) {
            return Err(ProcuraError::Repository(format!(
                "cannot update unknown supplier {}",
                supplier.id
            )));
        }
        rows.insert(supplier.id, supplier);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<Supplier>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|supplier| match term {
                Some(t) => matches_search(supplier, t),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SupplierStore for InMemorySupplierStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Supplier>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }
}

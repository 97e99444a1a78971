//! Supplier CRUD and query service

use std::sync::Arc;

use procura_common::validation::ValidationError;
use procura_domain::{NewSupplier, Supplier, SupplierUpdate};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::ports::SupplierRepository;
use super::query::{SortDirection, SupplierPage, SupplierQuery};

/// Caller-facing failures of supplier operations
#[derive(Debug, Error)]
pub enum SupplierServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("supplier {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Repository(#[from] procura_domain::ProcuraError),
}

/// Conventional CRUD over supplier master data
pub struct SupplierService {
    repository: Arc<dyn SupplierRepository>,
}

impl SupplierService {
    pub fn new(repository: Arc<dyn SupplierRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, input: NewSupplier) -> Result<Supplier, SupplierServiceError> {
        validate_new(&input)?;
        let supplier = Supplier::from_new(input);
        self.repository.insert(supplier.clone()).await?;
        info!(supplier_id = %supplier.id, "supplier created");
        Ok(supplier)
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, SupplierServiceError> {
        self.repository.get(id).await?.ok_or(SupplierServiceError::NotFound(id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: SupplierUpdate,
    ) -> Result<Supplier, SupplierServiceError> {
        validate_update(&update)?;
        let mut supplier =
            self.repository.get(id).await?.ok_or(SupplierServiceError::NotFound(id))?;
        supplier.apply_update(update);
        self.repository.update(supplier.clone()).await?;
        debug!(supplier_id = %id, "supplier updated");
        Ok(supplier)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), SupplierServiceError> {
        if self.repository.delete(id).await? {
            info!(supplier_id = %id, "supplier deleted");
            Ok(())
        } else {
            Err(SupplierServiceError::NotFound(id))
        }
    }

    /// List suppliers with store-side filtering, then sort and paginate.
    pub async fn list(&self, query: SupplierQuery) -> Result<SupplierPage, SupplierServiceError> {
        validate_query(&query)?;

        let mut items = self.repository.search(query.search.as_deref()).await?;
        let total = items.len();

        items.sort_by(|a, b| {
            let ordering = query.sort.compare(a, b);
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let offset = (query.page - 1).saturating_mul(query.page_size);
        let items = items.into_iter().skip(offset).take(query.page_size).collect();

        Ok(SupplierPage { items, total, page: query.page, page_size: query.page_size })
    }
}

fn validate_new(input: &NewSupplier) -> Result<(), ValidationError> {
    let mut error = ValidationError::new();
    check_legal_name(&mut error, &input.legal_name);
    check_tax_id(&mut error, &input.tax_id);
    check_email(&mut error, &input.contact_email);
    check_country(&mut error, &input.country);
    error.into_result()
}

fn validate_update(update: &SupplierUpdate) -> Result<(), ValidationError> {
    let mut error = ValidationError::new();
    if let Some(legal_name) = &update.legal_name {
        check_legal_name(&mut error, legal_name);
    }
    if let Some(tax_id) = &update.tax_id {
        check_tax_id(&mut error, tax_id);
    }
    if let Some(email) = &update.contact_email {
        check_email(&mut error, email);
    }
    if let Some(country) = &update.country {
        check_country(&mut error, country);
    }
    error.into_result()
}

fn validate_query(query: &SupplierQuery) -> Result<(), ValidationError> {
    let mut error = ValidationError::new();
    if query.page == 0 {
        error.add("page", "page.min", "page numbers start at 1");
    }
    if query.page_size == 0 || query.page_size > 500 {
        error.add("page_size", "page_size.range", "page size must be between 1 and 500");
    }
    error.into_result()
}

fn check_legal_name(error: &mut ValidationError, value: &str) {
    if value.trim().is_empty() {
        error.add("legal_name", "legal_name.required", "legal name must not be empty");
    }
}

fn check_tax_id(error: &mut ValidationError, value: &str) {
    if value.trim().is_empty() {
        error.add("tax_id", "tax_id.required", "tax id must not be empty");
    }
}

fn check_email(error: &mut ValidationError, value: &str) {
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        error.add("contact_email", "contact_email.format", "contact email is not a valid address");
    }
}

fn check_country(error: &mut ValidationError, value: &str) {
    if value.len() != 2 || !value.chars().all(|c| c.is_ascii_uppercase()) {
        error.add("country", "country.format", "country must be an ISO 3166-1 alpha-2 code");
    }
}

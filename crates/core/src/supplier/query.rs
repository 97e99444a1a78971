//! Supplier list queries: search, sorting, pagination
//!
//! Sortable fields are a closed enum mapped to comparator functions;
//! unknown field names are rejected when the query is parsed, never
//! silently defaulted.

use std::cmp::Ordering;
use std::str::FromStr;

use procura_domain::{Supplier, SupplierStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for a sort-field name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort field '{0}', expected one of: legal_name, tax_id, country, status, created_at")]
pub struct UnknownSortField(pub String);

/// Closed set of sortable supplier fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierSortField {
    LegalName,
    TaxId,
    Country,
    Status,
    CreatedAt,
}

impl Default for SupplierSortField {
    fn default() -> Self {
        Self::LegalName
    }
}

impl FromStr for SupplierSortField {
    type Err = UnknownSortField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "legal_name" => Ok(Self::LegalName),
            "tax_id" => Ok(Self::TaxId),
            "country" => Ok(Self::Country),
            "status" => Ok(Self::Status),
            "created_at" => Ok(Self::CreatedAt),
            other => Err(UnknownSortField(other.to_string())),
        }
    }
}

impl SupplierSortField {
    /// Comparator for ascending order on this field.
    pub fn compare(self, a: &Supplier, b: &Supplier) -> Ordering {
        match self {
            Self::LegalName => a.legal_name.to_lowercase().cmp(&b.legal_name.to_lowercase()),
            Self::TaxId => a.tax_id.cmp(&b.tax_id),
            Self::Country => a.country.cmp(&b.country),
            Self::Status => status_rank(a.status).cmp(&status_rank(b.status)),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

fn status_rank(status: SupplierStatus) -> u8 {
    match status {
        SupplierStatus::Active => 0,
        SupplierStatus::Inactive => 1,
        SupplierStatus::Blocked => 2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Ascending
    }
}

/// Parameters for listing suppliers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierQuery {
    /// Case-insensitive substring matched against name/tax-id/email fields
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SupplierSortField,
    #[serde(default)]
    pub direction: SortDirection,
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SupplierQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SupplierSortField::default(),
            direction: SortDirection::default(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    25
}

/// One page of supplier results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierPage {
    pub items: Vec<Supplier>,
    /// Total matches before pagination
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Reference search semantics: case-insensitive substring over legal name,
/// trade name, tax id, and contact email. Stores may implement the filter
/// natively as long as these semantics are preserved.
pub fn matches_search(supplier: &Supplier, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    supplier.legal_name.to_lowercase().contains(&needle)
        || supplier
            .trade_name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
        || supplier.tax_id.to_lowercase().contains(&needle)
        || supplier.contact_email.to_lowercase().contains(&needle)
}

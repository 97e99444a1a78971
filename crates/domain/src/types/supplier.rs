//! Supplier master-data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a supplier record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    Active,
    Inactive,
    Blocked,
}

impl Default for SupplierStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A supplier master-data record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    /// Registered legal name; this is the name screened against external lists
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub tax_id: String,
    pub contact_email: String,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    pub status: SupplierStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Supplier {
    /// Materialize a new record from creation input.
    pub fn from_new(input: NewSupplier) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            legal_name: input.legal_name,
            trade_name: input.trade_name,
            tax_id: input.tax_id,
            contact_email: input.contact_email,
            country: input.country,
            status: SupplierStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn apply_update(&mut self, update: SupplierUpdate) {
        if let Some(legal_name) = update.legal_name {
            self.legal_name = legal_name;
        }
        if let Some(trade_name) = update.trade_name {
            self.trade_name = Some(trade_name);
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = tax_id;
        }
        if let Some(contact_email) = update.contact_email {
            self.contact_email = contact_email;
        }
        if let Some(country) = update.country {
            self.country = country;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Input shape for creating a supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSupplier {
    pub legal_name: String,
    pub trade_name: Option<String>,
    pub tax_id: String,
    pub contact_email: String,
    pub country: String,
}

/// Partial update for an existing supplier; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierUpdate {
    pub legal_name: Option<String>,
    pub trade_name: Option<String>,
    pub tax_id: Option<String>,
    pub contact_email: Option<String>,
    pub country: Option<String>,
    pub status: Option<SupplierStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_new() -> NewSupplier {
        NewSupplier {
            legal_name: "Acme Corp".to_string(),
            trade_name: None,
            tax_id: "DE811907980".to_string(),
            contact_email: "ap@acme.example".to_string(),
            country: "DE".to_string(),
        }
    }

    #[test]
    fn test_from_new_sets_defaults() {
        let supplier = Supplier::from_new(sample_new());
        assert_eq!(supplier.status, SupplierStatus::Active);
        assert_eq!(supplier.created_at, supplier.updated_at);
    }

    #[test]
    fn test_apply_update_only_touches_given_fields() {
        let mut supplier = Supplier::from_new(sample_new());
        let created = supplier.created_at;

        supplier.apply_update(SupplierUpdate {
            legal_name: Some("Acme Corporation".to_string()),
            status: Some(SupplierStatus::Blocked),
            ..Default::default()
        });

        assert_eq!(supplier.legal_name, "Acme Corporation");
        assert_eq!(supplier.status, SupplierStatus::Blocked);
        assert_eq!(supplier.tax_id, "DE811907980");
        assert_eq!(supplier.created_at, created);
        assert!(supplier.updated_at >= created);
    }
}

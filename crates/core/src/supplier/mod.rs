//! Supplier master-data services: CRUD plus filtering/sorting/pagination

pub mod ports;
pub mod query;
pub mod service;

pub use ports::SupplierRepository;
pub use query::{SortDirection, SupplierPage, SupplierQuery, SupplierSortField};
pub use service::{SupplierService, SupplierServiceError};

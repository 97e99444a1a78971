//! Supplier persistence adapters

mod memory;

pub use memory::InMemorySupplierStore;

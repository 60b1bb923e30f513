//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for durable data access; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! - [`MappingStore`] - Durable tier for short code mappings
//! - [`VisitRepository`] - Visit audit records

pub mod mapping_store;
pub mod visit_repository;

pub use mapping_store::{MappingStore, StoreError};
pub use visit_repository::VisitRepository;

#[cfg(test)]
pub use mapping_store::MockMappingStore;
#[cfg(test)]
pub use visit_repository::MockVisitRepository;

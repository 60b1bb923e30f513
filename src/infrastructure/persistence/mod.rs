//! PostgreSQL repository implementations.
//!
//! - [`PgMappingStore`] - Durable tier for short code mappings
//! - [`PgVisitRepository`] - Visit audit records

pub mod pg_mapping_store;
pub mod pg_visit_repository;

pub use pg_mapping_store::PgMappingStore;
pub use pg_visit_repository::PgVisitRepository;

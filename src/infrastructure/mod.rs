//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the two storage tiers:
//!
//! - [`cache`] - Cache tier (Redis and no-op implementations)
//! - [`persistence`] - Durable tier and visit storage (PostgreSQL)

pub mod cache;
pub mod persistence;

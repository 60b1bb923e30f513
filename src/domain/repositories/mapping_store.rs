//! Durable tier contract for mapping storage.

use crate::domain::entities::{Mapping, NewMapping};
use async_trait::async_trait;

/// Errors raised by the durable tier.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert hit an existing short code.
    #[error("short code {0} already exists")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Authoritative, persistent mapping storage.
///
/// Implementations must be safe for unbounded concurrent use; the resolution
/// engine and creation orchestrator never lock around calls.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingStore`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Looks up a mapping by short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(mapping))` if found
    /// - `Ok(None)` if the code is definitively absent
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the store cannot answer.
    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if the short code already exists.
    /// Duplicate inserts are never silently ignored.
    async fn insert(&self, new_mapping: &NewMapping) -> Result<(), StoreError>;

    /// Deletes a mapping. Returns `Ok(true)` if a row was removed.
    async fn delete(&self, short_code: &str) -> Result<bool, StoreError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}

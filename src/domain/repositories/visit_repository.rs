//! Repository trait for visit audit records.

use crate::domain::entities::{NewVisit, VisitTally};
use crate::domain::repositories::StoreError;
use async_trait::async_trait;

/// Repository interface for recording and tallying visits.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgVisitRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Records a single visit.
    async fn record_visit(&self, visit: NewVisit) -> Result<(), StoreError>;

    /// Returns the most visited short codes, highest first.
    async fn top_visited(&self, limit: i64) -> Result<Vec<VisitTally>, StoreError>;
}

//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewVisit, VisitTally};
use crate::domain::repositories::{StoreError, VisitRepository};

/// PostgreSQL repository for the `page_visits` audit table.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn record_visit(&self, visit: NewVisit) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO page_visits (short_code, ip, user_agent, referer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(visit.short_code)
        .bind(visit.ip)
        .bind(visit.user_agent)
        .bind(visit.referer)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn top_visited(&self, limit: i64) -> Result<Vec<VisitTally>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT short_code, COUNT(*) AS total
            FROM page_visits
            GROUP BY short_code
            ORDER BY total DESC, short_code
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(short_code, total)| VisitTally { short_code, total })
            .collect())
    }
}

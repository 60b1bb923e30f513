//! PostgreSQL implementation of the durable mapping tier.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::{MappingStore, StoreError};

/// PostgreSQL mapping store backed by the `urls` table.
///
/// `short_code` is the primary key, so duplicate inserts surface as
/// [`StoreError::Duplicate`] instead of being ignored.
pub struct PgMappingStore {
    pool: Arc<PgPool>,
}

impl PgMappingStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MappingRow {
    short_code: String,
    target_url: String,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping::new(row.short_code, row.target_url, row.expires_at, row.created_at)
    }
}

#[async_trait]
impl MappingStore for PgMappingStore {
    async fn get(&self, short_code: &str) -> Result<Option<Mapping>, StoreError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT short_code, target_url, expires_at, created_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn insert(&self, new_mapping: &NewMapping) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO urls (short_code, target_url, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&new_mapping.short_code)
        .bind(&new_mapping.target_url)
        .bind(new_mapping.expires_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                StoreError::Duplicate(new_mapping.short_code.clone())
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(())
    }

    async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM urls WHERE short_code = $1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}

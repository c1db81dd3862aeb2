//! SEO metadata management.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::SeoRecordId;

use super::RepositoryError;

/// SEO metadata for one route path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SeoRecord {
    pub id: SeoRecordId,
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub og_image_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for upserting a record.
#[derive(Debug, Clone)]
pub struct SeoInput {
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub og_image_url: Option<String>,
}

/// Repository for SEO metadata writes.
pub struct SeoAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SeoAdminRepository<'a> {
    /// Create a new SEO admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All records, by path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<SeoRecord>, RepositoryError> {
        let rows = sqlx::query_as::<_, SeoRecord>(
            r"
            SELECT id, path, title, description, og_image_url, updated_at
            FROM seo_records
            ORDER BY path ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert or replace the record for a path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    pub async fn upsert(&self, input: &SeoInput) -> Result<SeoRecord, RepositoryError> {
        let record = sqlx::query_as::<_, SeoRecord>(
            r"
            INSERT INTO seo_records (path, title, description, og_image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (path)
            DO UPDATE SET title = EXCLUDED.title,
                          description = EXCLUDED.description,
                          og_image_url = EXCLUDED.og_image_url,
                          updated_at = now()
            RETURNING id, path, title, description, og_image_url, updated_at
            ",
        )
        .bind(&input.path)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.og_image_url)
        .fetch_one(self.pool)
        .await?;
        Ok(record)
    }

    /// Delete the record for a path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no record exists for it.
    pub async fn delete(&self, path: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM seo_records WHERE path = $1")
            .bind(path)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

//! Per-route SEO metadata reads.

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

/// Read-side repository for SEO metadata. Writes go through the admin
/// binary.
pub struct SeoRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SeoRepository<'a> {
    /// Create a new SEO repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Metadata for a route path, if any has been configured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_path(&self, path: &str) -> Result<Option<SeoRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, SeoRecord>(
            r"
            SELECT id, path, title, description, og_image_url, updated_at
            FROM seo_records
            WHERE path = $1
            ",
        )
        .bind(path)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }
}

//! Web vitals ingestion.
//!
//! Browsers POST Core Web Vitals samples; the admin analytics pages
//! aggregate them. This side only inserts.

use sqlx::PgPool;

use dukkan_core::WebVitalRating;

use super::RepositoryError;

/// A single browser performance sample.
#[derive(Debug, Clone)]
pub struct VitalSample {
    pub metric: String,
    pub value: f64,
    pub rating: WebVitalRating,
    pub path: String,
}

/// Repository for web vitals ingestion.
pub struct VitalsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VitalsRepository<'a> {
    /// Create a new vitals repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record one sample.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, sample: &VitalSample) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO web_vitals (metric, value, rating, path)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&sample.metric)
        .bind(sample.value)
        .bind(sample.rating)
        .bind(&sample.path)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

//! Database operations for the admin dashboard.
//!
//! The admin binary shares the storefront's `PostgreSQL` database and owns
//! the write side of the catalog plus the tables the storefront never
//! touches (drivers, admin users, analytics reads).
//!
//! Queries use the runtime-checked sqlx API with `FromRow` models so the
//! workspace builds without a live database.

pub mod admin_users;
pub mod analytics;
pub mod catalog;
pub mod drivers;
pub mod notifications;
pub mod orders;
pub mod seo;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admin_users::AdminUserRepository;
pub use analytics::AnalyticsRepository;
pub use catalog::CatalogAdminRepository;
pub use drivers::DriverRepository;
pub use notifications::NotificationAdminRepository;
pub use orders::OrderAdminRepository;
pub use seo::SeoAdminRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a sqlx error, converting unique violations into `Conflict`.
    pub(crate) fn from_sqlx(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

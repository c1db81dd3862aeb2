//! Database operations for the storefront `PostgreSQL`.
//!
//! # Tables
//!
//! - `users` / `addresses` - accounts and shipping addresses
//! - `categories` / `products` - the catalog
//! - `carts` / `cart_items` - user and guest carts
//! - `orders` / `order_items` - placed orders with price snapshots
//! - `notifications` - durable in-app notification records
//! - `seo_records` - per-route SEO metadata
//! - `web_vitals` - ingested browser performance samples
//!
//! Queries use the runtime-checked sqlx API with `FromRow` models so the
//! workspace builds without a live database.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p dukkan-cli -- migrate
//! ```

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod notifications;
pub mod orders;
pub mod seo;
pub mod users;
pub mod vitals;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use carts::CartRepository;
pub use catalog::CatalogRepository;
pub use notifications::NotificationRepository;
pub use orders::OrderRepository;
pub use seo::SeoRepository;
pub use users::UserRepository;
pub use vitals::VitalsRepository;

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

    /// Constraint violation (e.g., unique email or slug).
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

//! Database migration command.
//!
//! The storefront and admin binaries share one database; all migrations
//! live under `crates/storefront/migrations/` and are embedded into this
//! binary at compile time.

use dukkan_admin::db;

use super::CliError;

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

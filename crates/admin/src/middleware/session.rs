//! Session middleware configuration for the admin dashboard.
//!
//! A distinct cookie name keeps admin sessions separate from storefront
//! sessions even when both run behind one hostname in development.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "dukkan_admin_session";

/// Session expiry time in seconds (8 hours; operators re-authenticate daily).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Create the session layer with a `PostgreSQL` store.
///
/// # Errors
///
/// Returns an error if the sessions table migration fails.
pub async fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    let store = PostgresStore::new(pool.clone());
    store.migrate().await?;

    let is_secure = config.base_url.starts_with("https://");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/"))
}

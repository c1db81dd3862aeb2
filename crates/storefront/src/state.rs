//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;

use crate::cache::{CacheKey, CacheValue, build_catalog_cache};
use crate::config::StorefrontConfig;
use crate::services::{PushClient, WhatsappClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, catalog cache, and outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog_cache: Cache<CacheKey, CacheValue>,
    push: PushClient,
    whatsapp: Option<WhatsappClient>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let push = PushClient::new(config.push.clone());
        let whatsapp = config.whatsapp.clone().map(WhatsappClient::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog_cache: build_catalog_cache(),
                push,
                whatsapp,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<CacheKey, CacheValue> {
        &self.inner.catalog_cache
    }

    /// Get a reference to the push client.
    #[must_use]
    pub fn push(&self) -> &PushClient {
        &self.inner.push
    }

    /// Get a reference to the WhatsApp client, if configured.
    #[must_use]
    pub fn whatsapp(&self) -> Option<&WhatsappClient> {
        self.inner.whatsapp.as_ref()
    }
}

//! Application state shared across admin handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{EmailService, PushClient, WhatsappClient};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    push: PushClient,
    whatsapp: Option<WhatsappClient>,
    email: Option<EmailService>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(
        config: AdminConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let push = PushClient::new(config.push.clone());
        let whatsapp = config.whatsapp.clone().map(WhatsappClient::new);
        let email = config
            .email
            .as_ref()
            .map(EmailService::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                push,
                whatsapp,
                email,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
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

    /// Get a reference to the email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }
}

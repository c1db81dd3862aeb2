//! WhatsApp Business Cloud API client.
//!
//! Sends order confirmations to customers. The client is optional; when no
//! credentials are configured the storefront simply skips WhatsApp
//! delivery.

use secrecy::ExposeSecret;
use thiserror::Error;

use dukkan_core::Phone;

use crate::config::WhatsappConfig;

/// Errors from sending WhatsApp messages.
#[derive(Debug, Error)]
pub enum WhatsappError {
    /// The HTTP request itself failed.
    #[error("whatsapp request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The Cloud API answered with a non-success status.
    #[error("whatsapp api returned status {0}")]
    Status(u16),
}

/// Client for the WhatsApp Business Cloud API.
#[derive(Clone)]
pub struct WhatsappClient {
    http: reqwest::Client,
    config: WhatsappConfig,
}

impl WhatsappClient {
    /// Create a new WhatsApp client.
    #[must_use]
    pub fn new(config: WhatsappConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a plain text message to a customer.
    ///
    /// # Errors
    ///
    /// Returns `WhatsappError` if the request fails or the API rejects it.
    pub async fn send_text(&self, to: &Phone, body: &str) -> Result<(), WhatsappError> {
        let url = format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&serde_json::json!({
                "messaging_product": "whatsapp",
                "to": to.as_str(),
                "type": "text",
                "text": { "body": body },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WhatsappError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

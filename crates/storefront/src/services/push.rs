//! Client for the hosted pub/sub push service.
//!
//! The push service delivers real-time events to subscribed browsers over
//! channels. The storefront publishes order events; browsers subscribe
//! client-side with a public key that never passes through here.

use secrecy::ExposeSecret;
use serde_json::Value;
use thiserror::Error;

use crate::config::PushConfig;

/// Errors from publishing push events.
#[derive(Debug, Error)]
pub enum PushError {
    /// The HTTP request itself failed.
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The push service answered with a non-success status.
    #[error("push service returned status {0}")]
    Status(u16),
}

/// Client for publishing events to the push service.
#[derive(Clone)]
pub struct PushClient {
    http: reqwest::Client,
    config: PushConfig,
}

impl PushClient {
    /// Create a new push client.
    #[must_use]
    pub fn new(config: PushConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Publish `event` with `payload` on `channel`.
    ///
    /// # Errors
    ///
    /// Returns `PushError` if the request fails or the service rejects it.
    pub async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &Value,
    ) -> Result<(), PushError> {
        let url = format!("{}/publish", self.config.api_base.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&serde_json::json!({
                "channel": channel,
                "event": event,
                "payload": payload,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PushError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

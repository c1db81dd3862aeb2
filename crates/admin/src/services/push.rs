//! Client for the hosted pub/sub push service, plus webhook verification.
//!
//! The admin publishes notification events to per-user channels and a
//! broadcast channel. The push service can call back with delivery
//! webhooks signed with HMAC-SHA256.

use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde_json::Value;
use sha2::Sha256;
use thiserror::Error;

use dukkan_core::UserId;

use crate::config::PushConfig;

type HmacSha256 = Hmac<Sha256>;

/// Channel every storefront browser subscribes to.
pub const BROADCAST_CHANNEL: &str = "store-broadcast";

/// Per-user channel name.
#[must_use]
pub fn user_channel(user_id: UserId) -> String {
    format!("user-{user_id}")
}

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

    /// Verify a delivery webhook's HMAC-SHA256 signature (hex-encoded).
    ///
    /// Returns `false` when no webhook secret is configured; unsigned
    /// webhooks are never trusted.
    #[must_use]
    pub fn verify_webhook(&self, body: &[u8], signature_hex: &str) -> bool {
        let Some(secret) = self.config.webhook_secret.as_ref() else {
            return false;
        };
        let Ok(signature) = hex::decode(signature_hex) else {
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&signature).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client_with_secret(secret: Option<&str>) -> PushClient {
        PushClient::new(PushConfig {
            api_base: "https://push.example.com".to_owned(),
            api_key: SecretString::from("key"),
            webhook_secret: secret.map(SecretString::from),
        })
    }

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_valid_signature_accepted() {
        let client = client_with_secret(Some("webhook_secret"));
        let body = br#"{"event":"delivered"}"#;
        let signature = sign("webhook_secret", body);
        assert!(client.verify_webhook(body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let client = client_with_secret(Some("webhook_secret"));
        let signature = sign("webhook_secret", b"original");
        assert!(!client.verify_webhook(b"tampered", &signature));
    }

    #[test]
    fn test_unsigned_config_rejects_everything() {
        let client = client_with_secret(None);
        let body = b"anything";
        let signature = sign("whatever", body);
        assert!(!client.verify_webhook(body, &signature));
    }

    #[test]
    fn test_user_channel_format() {
        assert_eq!(user_channel(UserId::from(7)), "user-7");
    }
}

//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DUKKAN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `DUKKAN_BASE_URL` - Public URL for the storefront
//! - `DUKKAN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `PUSH_API_BASE` - Base URL of the hosted pub/sub push service
//! - `PUSH_API_KEY` - API key for publishing push events
//!
//! ## Optional
//! - `DUKKAN_HOST` - Bind address (default: 127.0.0.1)
//! - `DUKKAN_PORT` - Listen port (default: 3000)
//! - `STORE_CURRENCY` - ISO 4217 currency code (default: EGP)
//! - `CDN_BASE_URL` - Image hosting/CDN base URL
//! - `WHATSAPP_PHONE_NUMBER_ID` / `WHATSAPP_ACCESS_TOKEN` - WhatsApp Business
//!   Cloud API credentials (WhatsApp delivery disabled when unset)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Error tracking

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use dukkan_core::CurrencyCode;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Store currency for displayed prices
    pub currency: CurrencyCode,
    /// Image hosting/CDN base URL
    pub cdn_base_url: Option<String>,
    /// Hosted push (pub/sub) service configuration
    pub push: PushConfig,
    /// WhatsApp Business API configuration (optional)
    pub whatsapp: Option<WhatsappConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Hosted pub/sub push service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct PushConfig {
    /// Base URL of the push service REST API
    pub api_base: String,
    /// API key for publishing events
    pub api_key: SecretString,
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// WhatsApp Business Cloud API configuration.
#[derive(Clone)]
pub struct WhatsappConfig {
    /// Graph API base URL
    pub api_base: String,
    /// Business phone number ID used as the sender
    pub phone_number_id: String,
    /// Bearer token for the Cloud API
    pub access_token: SecretString,
}

impl std::fmt::Debug for WhatsappConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsappConfig")
            .field("api_base", &self.api_base)
            .field("phone_number_id", &self.phone_number_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("DUKKAN_DATABASE_URL")?;
        let host = get_env_or_default("DUKKAN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DUKKAN_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("DUKKAN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DUKKAN_PORT".to_owned(), e.to_string()))?;
        let base_url = get_required_env("DUKKAN_BASE_URL")?;

        let session_secret = SecretString::from(get_required_env("DUKKAN_SESSION_SECRET")?);
        validate_session_secret(&session_secret, "DUKKAN_SESSION_SECRET")?;

        let currency_code = get_env_or_default("STORE_CURRENCY", "EGP");
        let currency = CurrencyCode::from_code(&currency_code).ok_or_else(|| {
            ConfigError::InvalidEnvVar("STORE_CURRENCY".to_owned(), currency_code.clone())
        })?;

        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            currency,
            cdn_base_url: get_optional_env("CDN_BASE_URL"),
            push: PushConfig::from_env()?,
            whatsapp: WhatsappConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PushConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: get_required_env("PUSH_API_BASE")?,
            api_key: SecretString::from(get_required_env("PUSH_API_KEY")?),
        })
    }
}

impl WhatsappConfig {
    /// WhatsApp is optional; returns `None` when credentials are unset.
    fn from_env() -> Option<Self> {
        let phone_number_id = get_optional_env("WHATSAPP_PHONE_NUMBER_ID")?;
        let access_token = get_optional_env("WHATSAPP_ACCESS_TOKEN")?;
        Some(Self {
            api_base: get_env_or_default("WHATSAPP_API_BASE", "https://graph.facebook.com/v21.0"),
            phone_number_id,
            access_token: SecretString::from(access_token),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a sample rate in `0.0..=1.0` with a default.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("sample rate must be within 0.0..=1.0, got {rate}"),
        ));
    }
    Ok(rate)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("x".repeat(32));
        assert!(validate_session_secret(&secret, "TEST_SESSION").is_ok());
    }

    #[test]
    fn test_push_config_debug_redacts_key() {
        let config = PushConfig {
            api_base: "https://push.example.com".to_owned(),
            api_key: SecretString::from("super_secret_key"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://push.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }

    #[test]
    fn test_whatsapp_config_debug_redacts_token() {
        let config = WhatsappConfig {
            api_base: "https://graph.facebook.com/v21.0".to_owned(),
            phone_number_id: "1234567890".to_owned(),
            access_token: SecretString::from("super_secret_token"),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("1234567890"));
        assert!(!debug_output.contains("super_secret_token"));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: SecretString::from("x".repeat(32)),
            currency: CurrencyCode::EGP,
            cdn_base_url: None,
            push: PushConfig {
                api_base: "https://push.example.com".to_owned(),
                api_key: SecretString::from("key"),
            },
            whatsapp: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}

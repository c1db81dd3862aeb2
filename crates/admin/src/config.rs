//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DUKKAN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `ADMIN_BASE_URL` - URL the dashboard is served from
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `PUSH_API_BASE` / `PUSH_API_KEY` - Hosted pub/sub push service
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `STORE_CURRENCY` - ISO 4217 currency code (default: EGP)
//! - `PUSH_WEBHOOK_SECRET` - HMAC secret for push delivery webhooks
//! - `WHATSAPP_PHONE_NUMBER_ID` / `WHATSAPP_ACCESS_TOKEN` - WhatsApp Business
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_USERNAME` / `SMTP_PASSWORD` /
//!   `SMTP_FROM_ADDRESS` - transactional email (disabled when unset)
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// URL the dashboard is served from
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Store currency for displayed totals
    pub currency: CurrencyCode,
    /// Hosted push (pub/sub) service configuration
    pub push: PushConfig,
    /// WhatsApp Business API configuration (optional)
    pub whatsapp: Option<WhatsappConfig>,
    /// SMTP configuration for transactional email (optional)
    pub email: Option<EmailConfig>,
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
#[derive(Clone)]
pub struct PushConfig {
    /// Base URL of the push service REST API
    pub api_base: String,
    /// API key for publishing events
    pub api_key: SecretString,
    /// Shared secret for verifying delivery webhooks (optional)
    pub webhook_secret: Option<SecretString>,
}

impl std::fmt::Debug for PushConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushConfig")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "[REDACTED]"))
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

/// SMTP configuration for transactional email.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret is too short.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("DUKKAN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_owned(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;

        let session_secret = SecretString::from(get_required_env("ADMIN_SESSION_SECRET")?);
        validate_session_secret(&session_secret, "ADMIN_SESSION_SECRET")?;

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
            push: PushConfig::from_env()?,
            whatsapp: WhatsappConfig::from_env(),
            email: EmailConfig::from_env()?,
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
            webhook_secret: get_optional_env("PUSH_WEBHOOK_SECRET").map(SecretString::from),
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

impl EmailConfig {
    /// Email is optional; returns `None` when `SMTP_HOST` is unset.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_owned(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: SecretString::from(get_required_env("SMTP_PASSWORD")?),
            from_address: get_required_env("SMTP_FROM_ADDRESS")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

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
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            smtp_username: "mailer".to_owned(),
            smtp_password: SecretString::from("smtp_secret"),
            from_address: "noreply@example.com".to_owned(),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.example.com"));
        assert!(!debug_output.contains("smtp_secret"));
    }

    #[test]
    fn test_session_secret_length_check() {
        assert!(validate_session_secret(&SecretString::from("short"), "S").is_err());
        assert!(validate_session_secret(&SecretString::from("x".repeat(48)), "S").is_ok());
    }
}

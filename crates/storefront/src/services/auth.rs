//! Customer authentication with argon2 password hashing.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use dukkan_core::{Email, Phone};

use crate::db::{RepositoryError, UserRepository, users::User};
use crate::error::AppError;

/// Minimum password length for new accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during customer authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately indistinguishable from an
    /// unknown account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("account already exists")]
    UserAlreadyExists,

    /// Password fails the strength requirement.
    #[error("{0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Password hashing or verification infrastructure failed.
    #[error("password hash error: {0}")]
    Hash(String),
}

/// Customer authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` on
    /// bad input, `AuthError::UserAlreadyExists` for duplicate emails, and
    /// database errors otherwise.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        phone: Option<&Phone>,
        password: &str,
    ) -> Result<User, AppError> {
        let email = Email::parse(email).map_err(|e| AuthError::InvalidEmail(e.to_string()))?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        match self.users.create(&email, name, phone, &password_hash).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::Conflict(_)) => Err(AuthError::UserAlreadyExists.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are not distinguished.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(record) = self.users.get_by_email_with_password(&email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        if verify_password(&record.password_hash, password)? {
            Ok(record.user)
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}

/// Hash a password with argon2id and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a password against a stored argon2 hash.
fn verify_password(stored_hash: &str, password: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password(&hash, "correct horse battery").unwrap());
        assert!(!verify_password(&hash, "wrong password").unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough password").is_ok());
    }
}

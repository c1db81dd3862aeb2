//! Operator authentication with argon2 password hashing.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use dukkan_core::{AdminRole, Email};

use crate::db::{AdminUserRepository, RepositoryError, admin_users::AdminUser};

/// Minimum password length for operator accounts.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Errors that can occur during operator authentication.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An operator with this email already exists.
    #[error("operator already exists")]
    UserAlreadyExists,

    /// Password fails the strength requirement.
    #[error("{0}")]
    WeakPassword(String),

    /// Email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Password hashing infrastructure failed.
    #[error("password hash error: {0}")]
    Hash(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Operator authentication service.
pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new operator authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Create an operator account. Used by the CLI, not exposed over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::UserAlreadyExists` for duplicate emails,
    /// input errors for a bad email or weak password.
    pub async fn create_operator(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser, AdminAuthError> {
        let email =
            Email::parse(email).map_err(|e| AdminAuthError::InvalidEmail(e.to_string()))?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AdminAuthError::WeakPassword(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let password_hash = hash_password(password)?;

        match self.users.create(&email, name, &password_hash, role).await {
            Ok(user) => Ok(user),
            Err(RepositoryError::Conflict(_)) => Err(AdminAuthError::UserAlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and return the operator.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` for an unknown email or
    /// wrong password; the two cases are not distinguished.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email).map_err(|_| AdminAuthError::InvalidCredentials)?;

        let Some(record) = self.users.get_by_email_with_password(&email).await? else {
            return Err(AdminAuthError::InvalidCredentials);
        };

        if verify_password(&record.password_hash, password)? {
            Ok(record.user)
        } else {
            Err(AdminAuthError::InvalidCredentials)
        }
    }
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminAuthError::Hash(e.to_string()))
}

fn verify_password(stored_hash: &str, password: &str) -> Result<bool, AdminAuthError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| AdminAuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_roundtrip() {
        let hash = hash_password("operator passphrase!").unwrap();
        assert!(verify_password(&hash, "operator passphrase!").unwrap());
        assert!(!verify_password(&hash, "other passphrase").unwrap());
    }
}

//! Customer account persistence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{Email, Phone, UserId};

use super::RepositoryError;

/// A customer account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub phone: Option<Phone>,
    pub created_at: DateTime<Utc>,
}

/// A user joined with their password hash, for credential checks only.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Repository for customer accounts.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already
    /// registered.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        phone: Option<&Phone>,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (email, name, phone, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, phone, created_at
            ",
        )
        .bind(email)
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "An account with this email already exists"))
    }

    /// Look up an account by email, with its password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<UserWithPassword>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            r"
            SELECT id, email, name, phone, created_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Look up an account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    pub async fn get_by_id(&self, user_id: UserId) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            SELECT id, email, name, phone, created_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Update the account's display name and phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such account exists.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        name: &str,
        phone: Option<&Phone>,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET name = $2, phone = $3
            WHERE id = $1
            RETURNING id, email, name, phone, created_at
            ",
        )
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

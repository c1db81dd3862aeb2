//! Dashboard operator accounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{AdminRole, AdminUserId, Email};

use super::RepositoryError;

/// A dashboard operator.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

/// An operator joined with their password hash, for credential checks.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUserWithPassword {
    #[sqlx(flatten)]
    pub user: AdminUser,
    pub password_hash: String,
}

/// Repository for operator accounts.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new operator account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for duplicate emails.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
        role: AdminRole,
    ) -> Result<AdminUser, RepositoryError> {
        sqlx::query_as::<_, AdminUser>(
            r"
            INSERT INTO admin_users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at
            ",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "An operator with this email already exists"))
    }

    /// Look up an operator by email, with the password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<AdminUserWithPassword>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserWithPassword>(
            r"
            SELECT id, email, name, role, created_at, password_hash
            FROM admin_users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Look up an operator by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such operator exists.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<AdminUser, RepositoryError> {
        sqlx::query_as::<_, AdminUser>(
            r"SELECT id, email, name, role, created_at FROM admin_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }
}

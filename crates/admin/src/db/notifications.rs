//! Admin-side notification writes.
//!
//! Records are always inserted before any push delivery is attempted, so a
//! failed push never loses the notification.

use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{NotificationChannel, NotificationId, UserId};

use super::RepositoryError;

/// Content of a notification to insert.
#[derive(Debug, Clone)]
pub struct NotificationInput {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub channel: NotificationChannel,
}

/// A customer targeted by a broadcast.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Recipient {
    pub id: UserId,
    pub email: String,
    pub phone: Option<String>,
}

/// Repository for notification writes.
pub struct NotificationAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationAdminRepository<'a> {
    /// Create a new notification admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification for one user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        input: &NotificationInput,
    ) -> Result<NotificationId, RepositoryError> {
        let id: NotificationId = sqlx::query_scalar(
            r"
            INSERT INTO notifications (user_id, title, body, link, channel)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.link)
        .bind(input.channel)
        .fetch_one(self.pool)
        .await?;
        Ok(id)
    }

    /// Insert the same notification for every customer, returning the
    /// number inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_broadcast(
        &self,
        input: &NotificationInput,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO notifications (user_id, title, body, link, channel)
            SELECT id, $1, $2, $3, $4 FROM users
            ",
        )
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.link)
        .bind(input.channel)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// All customers, for broadcast fan-out over external channels.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn recipients(&self) -> Result<Vec<Recipient>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, Recipient>(r"SELECT id, email, phone FROM users ORDER BY id")
                .fetch_all(self.pool)
                .await?;
        Ok(rows)
    }

    /// One customer by id, for targeted sends.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such customer exists.
    pub async fn recipient(&self, user_id: UserId) -> Result<Recipient, RepositoryError> {
        sqlx::query_as::<_, Recipient>(r"SELECT id, email, phone FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}

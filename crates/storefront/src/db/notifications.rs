//! Durable in-app notification records.
//!
//! Notifications are inserted before any push delivery is attempted, so a
//! failed push never loses the record. Operator-initiated notifications
//! come from the admin binary; the storefront inserts only the
//! order-placed record at checkout, and otherwise reads and marks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{NotificationId, UserId};

use super::RepositoryError;

/// A notification row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(skip)]
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository for a user's notifications.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        title: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, Notification>(
            r"
            INSERT INTO notifications (user_id, title, body, link)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, body, link, is_read, created_at
            ",
        )
        .bind(user_id)
        .bind(title)
        .bind(body)
        .bind(link)
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// The user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query_as::<_, Notification>(
            r"
            SELECT id, user_id, title, body, link, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            ",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of unread notifications.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unread_count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification read. Returns whether a row changed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_read(
        &self,
        notification_id: NotificationId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"UPDATE notifications SET is_read = true WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark every notification for the user read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query(r"UPDATE notifications SET is_read = true WHERE user_id = $1 AND NOT is_read")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}

//! Shipping address persistence.
//!
//! Every query is scoped by `user_id` so one account can never read or
//! mutate another account's addresses. At most one address per user is the
//! default, enforced by a partial unique index and a transactional swap.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{AddressId, UserId};

use super::RepositoryError;

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    #[serde(skip)]
    pub user_id: UserId,
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating or updating an address.
#[derive(Debug, Clone)]
pub struct AddressInput {
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
}

/// Repository for address operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All addresses for a user, default first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, Address>(
            r"
            SELECT id, user_id, label, recipient_name, phone, city, area,
                   street, building, apartment, notes, is_default, created_at
            FROM addresses
            WHERE user_id = $1
            ORDER BY is_default DESC, created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// A single address, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn get_for_user(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<Address, RepositoryError> {
        sqlx::query_as::<_, Address>(
            r"
            SELECT id, user_id, label, recipient_name, phone, city, area,
                   street, building, apartment, notes, is_default, created_at
            FROM addresses
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create an address. The user's first address becomes the default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &AddressInput,
    ) -> Result<Address, RepositoryError> {
        let address = sqlx::query_as::<_, Address>(
            r"
            INSERT INTO addresses
                (user_id, label, recipient_name, phone, city, area, street,
                 building, apartment, notes, is_default)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    NOT EXISTS (SELECT 1 FROM addresses WHERE user_id = $1))
            RETURNING id, user_id, label, recipient_name, phone, city, area,
                      street, building, apartment, notes, is_default, created_at
            ",
        )
        .bind(user_id)
        .bind(&input.label)
        .bind(&input.recipient_name)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.area)
        .bind(&input.street)
        .bind(&input.building)
        .bind(&input.apartment)
        .bind(&input.notes)
        .fetch_one(self.pool)
        .await?;
        Ok(address)
    }

    /// Update an address owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn update(
        &self,
        address_id: AddressId,
        user_id: UserId,
        input: &AddressInput,
    ) -> Result<Address, RepositoryError> {
        sqlx::query_as::<_, Address>(
            r"
            UPDATE addresses
            SET label = $3, recipient_name = $4, phone = $5, city = $6,
                area = $7, street = $8, building = $9, apartment = $10,
                notes = $11
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, label, recipient_name, phone, city, area,
                      street, building, apartment, notes, is_default, created_at
            ",
        )
        .bind(address_id)
        .bind(user_id)
        .bind(&input.label)
        .bind(&input.recipient_name)
        .bind(&input.phone)
        .bind(&input.city)
        .bind(&input.area)
        .bind(&input.street)
        .bind(&input.building)
        .bind(&input.apartment)
        .bind(&input.notes)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an address owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn delete(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(address_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Make an address the user's default, demoting the previous default in
    /// the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the address does not exist or
    /// belongs to another user.
    pub async fn set_default(
        &self,
        address_id: AddressId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r"UPDATE addresses SET is_default = false WHERE user_id = $1 AND is_default")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result =
            sqlx::query(r"UPDATE addresses SET is_default = true WHERE id = $1 AND user_id = $2")
                .bind(address_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

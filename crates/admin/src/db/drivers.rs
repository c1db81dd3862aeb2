//! Delivery driver management.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{DriverId, DriverStatus};

use super::RepositoryError;

/// A delivery driver.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub phone: String,
    pub status: DriverStatus,
    pub created_at: DateTime<Utc>,
}

/// A driver with their count of undelivered assigned orders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DriverWithLoad {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub driver: Driver,
    pub active_orders: i64,
}

/// Repository for drivers.
pub struct DriverRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DriverRepository<'a> {
    /// Create a new driver repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All drivers with their active order load, available first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<DriverWithLoad>, RepositoryError> {
        let rows = sqlx::query_as::<_, DriverWithLoad>(
            r"
            SELECT d.id, d.name, d.phone, d.status, d.created_at,
                   COUNT(o.id) FILTER (
                       WHERE o.status NOT IN ('delivered', 'cancelled')
                   ) AS active_orders
            FROM drivers d
            LEFT JOIN orders o ON o.driver_id = d.id
            GROUP BY d.id
            ORDER BY d.status ASC, d.name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One driver by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such driver exists.
    pub async fn get(&self, id: DriverId) -> Result<Driver, RepositoryError> {
        sqlx::query_as::<_, Driver>(
            r"SELECT id, name, phone, status, created_at FROM drivers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create a driver.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, name: &str, phone: &str) -> Result<Driver, RepositoryError> {
        let driver = sqlx::query_as::<_, Driver>(
            r"
            INSERT INTO drivers (name, phone)
            VALUES ($1, $2)
            RETURNING id, name, phone, status, created_at
            ",
        )
        .bind(name)
        .bind(phone)
        .fetch_one(self.pool)
        .await?;
        Ok(driver)
    }

    /// Update a driver's details and status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such driver exists.
    pub async fn update(
        &self,
        id: DriverId,
        name: &str,
        phone: &str,
        status: DriverStatus,
    ) -> Result<Driver, RepositoryError> {
        sqlx::query_as::<_, Driver>(
            r"
            UPDATE drivers
            SET name = $2, phone = $3, status = $4
            WHERE id = $1
            RETURNING id, name, phone, status, created_at
            ",
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a driver. Past orders keep a null driver reference.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such driver exists.
    pub async fn delete(&self, id: DriverId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

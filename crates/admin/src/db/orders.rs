//! Admin-side order management: listing, status transitions, dispatch.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{DriverId, OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;

/// An order as the dashboard sees it, joined with the customer.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminOrder {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub driver_id: Option<DriverId>,
    pub total: Decimal,
    pub currency_code: String,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item snapshot within an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

const ADMIN_ORDER_COLUMNS: &str = r"
    o.id, o.user_id, u.name AS customer_name, u.email AS customer_email,
    o.status, o.driver_id, o.total, o.currency_code, o.recipient_name,
    o.phone, o.city, o.area, o.street, o.building, o.apartment, o.notes,
    o.created_at, o.updated_at
";

/// Repository for admin order operations.
pub struct OrderAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderAdminRepository<'a> {
    /// Create a new admin order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ADMIN_ORDER_COLUMNS}
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE $1::order_status IS NULL OR o.status = $1
            ORDER BY o.created_at DESC
            LIMIT $2 OFFSET $3
            "
        );
        let rows = sqlx::query_as::<_, AdminOrder>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn get(&self, id: OrderId) -> Result<AdminOrder, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ADMIN_ORDER_COLUMNS}
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            "
        );
        sqlx::query_as::<_, AdminOrder>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// The line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, id: OrderId) -> Result<Vec<AdminOrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderItem>(
            r"
            SELECT product_id, name, unit_price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Set an order's status without transition checks; callers validate
    /// transitions first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<AdminOrder, RepositoryError> {
        sqlx::query(r"UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(self.pool)
            .await?;
        self.get(id).await
    }

    /// Assign a driver to an order, in one transaction: the order moves
    /// out for delivery and the driver is marked busy.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order or driver is
    /// missing.
    pub async fn assign_driver(
        &self,
        id: OrderId,
        driver_id: DriverId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE orders
            SET driver_id = $2, status = 'out_for_delivery', updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(driver_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        let driver = sqlx::query(r"UPDATE drivers SET status = 'busy' WHERE id = $1")
            .bind(driver_id)
            .execute(&mut *tx)
            .await?;
        if driver.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Free the order's driver if no other active order holds them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn release_driver(&self, driver_id: DriverId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            UPDATE drivers SET status = 'available'
            WHERE id = $1
              AND status = 'busy'
              AND NOT EXISTS (
                  SELECT 1 FROM orders
                  WHERE driver_id = $1
                    AND status NOT IN ('delivered', 'cancelled')
              )
            ",
        )
        .bind(driver_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

//! Order persistence for the storefront.
//!
//! Orders snapshot the shipping address and line prices at checkout so
//! later catalog or address edits never change what the customer agreed to.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{CartId, OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;

/// An order row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub user_id: UserId,
    pub status: OrderStatus,
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
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Shipping details snapshotted onto a new order.
#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
}

/// Repository for storefront order operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the user's cart in a single transaction: snapshot
    /// the cart lines with their current prices, insert the order and its
    /// items, then empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the cart is empty, otherwise
    /// `RepositoryError::Database` if any query fails.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
        currency_code: &str,
        shipping: &ShippingDetails,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let total: Option<Decimal> = sqlx::query_scalar(
            r"
            SELECT SUM(p.price * ci.quantity)
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ",
        )
        .bind(cart_id)
        .fetch_one(&mut *tx)
        .await?;

        let Some(total) = total else {
            tx.rollback().await?;
            return Err(RepositoryError::Conflict("Cart is empty".to_owned()));
        };

        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders
                (user_id, status, total, currency_code, recipient_name, phone,
                 city, area, street, building, apartment, notes)
            VALUES ($1, 'pending', $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, status, total, currency_code,
                      recipient_name, phone, city, area, street, building,
                      apartment, notes, created_at, updated_at
            ",
        )
        .bind(user_id)
        .bind(total)
        .bind(currency_code)
        .bind(&shipping.recipient_name)
        .bind(&shipping.phone)
        .bind(&shipping.city)
        .bind(&shipping.area)
        .bind(&shipping.street)
        .bind(&shipping.building)
        .bind(&shipping.apartment)
        .bind(&shipping.notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO order_items (order_id, product_id, name, unit_price, quantity)
            SELECT $1, p.id, p.name, p.price, ci.quantity
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $2
            ",
        )
        .bind(order.id)
        .bind(cart_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r"DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, status, total, currency_code,
                   recipient_name, phone, city, area, street, building,
                   apartment, notes, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// A single order, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist or
    /// belongs to another user.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Order, RepositoryError> {
        sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, status, total, currency_code,
                   recipient_name, phone, city, area, street, building,
                   apartment, notes, created_at, updated_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// The line items of an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT product_id, name, unit_price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

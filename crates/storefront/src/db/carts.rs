//! Cart persistence: user carts, guest carts, and line items.
//!
//! A cart belongs to either a signed-in user or a guest token, never both.
//! Guest carts are merged into the user cart at login.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use dukkan_core::{CartId, ProductId, UserId};

use super::RepositoryError;

/// A cart row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: Option<UserId>,
    pub guest_token: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub unit_price: Decimal,
    pub currency_code: String,
    pub quantity: i32,
    pub stock: i32,
}

impl CartLine {
    /// Line subtotal (unit price times quantity).
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Repository for cart operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create_for_user(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET updated_at = now()
            RETURNING id, user_id, guest_token, created_at, updated_at
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(cart)
    }

    /// Get the guest cart for a token, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create_for_guest(&self, token: Uuid) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            INSERT INTO carts (guest_token)
            VALUES ($1)
            ON CONFLICT (guest_token) DO UPDATE SET updated_at = now()
            RETURNING id, user_id, guest_token, created_at, updated_at
            ",
        )
        .bind(token)
        .fetch_one(self.pool)
        .await?;
        Ok(cart)
    }

    /// All lines in a cart, joined with product data, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLine>(
            r"
            SELECT ci.product_id, p.name, p.slug, p.image_url,
                   p.price AS unit_price, p.currency_code,
                   ci.quantity, p.stock
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Add `quantity` of a product to a cart. Existing lines accumulate.
    ///
    /// Only visible, in-stock products can be added.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is missing,
    /// hidden, or out of stock.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            SELECT $1, p.id, $3
            FROM products p
            WHERE p.id = $2 AND p.is_visible AND p.stock > 0
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          updated_at = now()
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Adjust a line's quantity by a signed delta. A line whose quantity
    /// would drop to zero or below is removed instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such line exists.
    pub async fn adjust_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        delta: i32,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_id = $1 AND product_id = $2 AND quantity + $3 <= 0
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(delta)
        .execute(&mut *tx)
        .await?;

        if removed.rows_affected() == 0 {
            let updated = sqlx::query(
                r"
                UPDATE cart_items
                SET quantity = quantity + $3, updated_at = now()
                WHERE cart_id = $1 AND product_id = $2
                ",
            )
            .bind(cart_id)
            .bind(product_id)
            .bind(delta)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such line exists.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query(r"DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove every line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query(r"DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Total number of items across all lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, cart_id: CartId) -> Result<i64, RepositoryError> {
        let count: Option<i64> = sqlx::query_scalar(
            r"SELECT SUM(quantity)::bigint FROM cart_items WHERE cart_id = $1",
        )
        .bind(cart_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Merge a guest cart into the user's cart, then delete the guest cart.
    ///
    /// Lines present in both carts have their quantities added. A missing
    /// guest cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query in the transaction
    /// fails.
    pub async fn merge_guest_into_user(
        &self,
        guest_token: Uuid,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let guest_cart_id: Option<CartId> =
            sqlx::query_scalar(r"SELECT id FROM carts WHERE guest_token = $1")
                .bind(guest_token)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(guest_cart_id) = guest_cart_id else {
            tx.commit().await?;
            return Ok(());
        };

        let user_cart_id: CartId = sqlx::query_scalar(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET updated_at = now()
            RETURNING id
            ",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            SELECT $1, product_id, quantity
            FROM cart_items
            WHERE cart_id = $2
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          updated_at = now()
            ",
        )
        .bind(user_cart_id)
        .bind(guest_cart_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(r"DELETE FROM carts WHERE id = $1")
            .bind(guest_cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_subtotal() {
        let line = CartLine {
            product_id: ProductId::from(1),
            name: "Olive oil".to_owned(),
            slug: "olive-oil".to_owned(),
            image_url: None,
            unit_price: Decimal::new(14950, 2),
            currency_code: "EGP".to_owned(),
            quantity: 3,
            stock: 10,
        };
        assert_eq!(line.subtotal(), Decimal::new(44850, 2));
    }
}

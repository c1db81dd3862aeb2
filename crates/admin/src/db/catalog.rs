//! Write-side catalog repository: category and product management.
//!
//! Unlike the storefront's read side, these queries see hidden entries
//! too.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{CategoryId, ProductId};

use super::RepositoryError;

/// A category as the dashboard sees it, including hidden ones.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_visible: bool,
}

/// A product as the dashboard sees it, including hidden ones.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_code: String,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating or updating a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_visible: bool,
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency_code: String,
    pub image_url: Option<String>,
    pub stock: i32,
    pub is_visible: bool,
}

/// Repository for catalog management.
pub struct CatalogAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogAdminRepository<'a> {
    /// Create a new catalog admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, hidden included, ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, position, is_visible
            FROM categories
            ORDER BY position ASC, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for a duplicate slug.
    pub async fn create_category(
        &self,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r"
            INSERT INTO categories (name, slug, position, is_visible)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, slug, position, is_visible
            ",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.position)
        .bind(input.is_visible)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "A category with this slug already exists"))
    }

    /// Update a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such category exists, or
    /// `RepositoryError::Conflict` for a duplicate slug.
    pub async fn update_category(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(
            r"
            UPDATE categories
            SET name = $2, slug = $3, position = $4, is_visible = $5
            WHERE id = $1
            RETURNING id, name, slug, position, is_visible
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.position)
        .bind(input.is_visible)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "A category with this slug already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a category; its products keep existing without a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such category exists.
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// All products, hidden included, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price,
                   currency_code, image_url, stock, is_visible,
                   created_at, updated_at
            FROM products
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// One product by id, hidden included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description, price,
                   currency_code, image_url, stock, is_visible,
                   created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for a duplicate slug.
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            INSERT INTO products
                (category_id, name, slug, description, price, currency_code,
                 image_url, stock, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, category_id, name, slug, description, price,
                      currency_code, image_url, stock, is_visible,
                      created_at, updated_at
            ",
        )
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.currency_code)
        .bind(&input.image_url)
        .bind(input.stock)
        .bind(input.is_visible)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "A product with this slug already exists"))
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such product exists, or
    /// `RepositoryError::Conflict` for a duplicate slug.
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            r"
            UPDATE products
            SET category_id = $2, name = $3, slug = $4, description = $5,
                price = $6, currency_code = $7, image_url = $8, stock = $9,
                is_visible = $10, updated_at = now()
            WHERE id = $1
            RETURNING id, category_id, name, slug, description, price,
                      currency_code, image_url, stock, is_visible,
                      created_at, updated_at
            ",
        )
        .bind(id)
        .bind(input.category_id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.currency_code)
        .bind(&input.image_url)
        .bind(input.stock)
        .bind(input.is_visible)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "A product with this slug already exists"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Fails if the product appears in any order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if orders reference it, or
    /// `RepositoryError::NotFound` if it does not exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r"DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "Product appears in orders; hide it instead of deleting".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

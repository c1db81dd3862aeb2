//! Read-side catalog repository: categories and products.
//!
//! The storefront only ever reads visible catalog entries; all writes go
//! through the admin binary.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use dukkan_core::{CategoryId, CurrencyCode, Price, ProductId};

use super::RepositoryError;

/// A product category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub position: i32,
    pub is_visible: bool,
}

/// A catalog product.
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

impl Product {
    /// The product's price as a typed [`Price`].
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(
            self.price,
            CurrencyCode::from_code(&self.currency_code).unwrap_or_default(),
        )
    }
}

/// A (slug, last-modified) pair for sitemap generation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SitemapEntry {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List visible categories ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, position, is_visible
            FROM categories
            WHERE is_visible
            ORDER BY position ASC, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a visible category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, position, is_visible
            FROM categories
            WHERE slug = $1 AND is_visible
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// List visible products, newest first, optionally filtered by
    /// category slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn products(
        &self,
        category_slug: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, Product>(
            r"
            SELECT p.id, p.category_id, p.name, p.slug, p.description,
                   p.price, p.currency_code, p.image_url, p.stock,
                   p.is_visible, p.created_at, p.updated_at
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.is_visible
              AND ($1::text IS NULL OR c.slug = $1)
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(category_slug)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a visible product by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, Product>(
            r"
            SELECT id, category_id, name, slug, description,
                   price, currency_code, image_url, stock,
                   is_visible, created_at, updated_at
            FROM products
            WHERE slug = $1 AND is_visible
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(row)
    }

    /// Slugs and timestamps of all visible products, for the sitemap.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, SitemapEntry>(
            r"SELECT slug, updated_at FROM products WHERE is_visible ORDER BY slug",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Slugs and timestamps of all visible categories, for the sitemap.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_sitemap_entries(&self) -> Result<Vec<SitemapEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, SitemapEntry>(
            r"SELECT slug, updated_at FROM categories WHERE is_visible ORDER BY slug",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}

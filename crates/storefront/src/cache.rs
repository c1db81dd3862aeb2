//! In-memory catalog cache.
//!
//! Catalog reads dominate storefront traffic, so visible products and
//! categories are cached with a short TTL. Admin-side edits show up within
//! a minute without any cross-process invalidation channel.

use std::time::Duration;

use moka::future::Cache;

use crate::db::catalog::{Category, Product};

/// Cache TTL for catalog entries.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// One product, by slug.
    Product(String),
    /// A page of the product listing.
    Products {
        category_slug: Option<String>,
        limit: i64,
        offset: i64,
    },
    /// The visible category list.
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}

/// Build the catalog cache.
#[must_use]
pub fn build_catalog_cache() -> Cache<CacheKey, CacheValue> {
    Cache::builder()
        .max_capacity(1000)
        .time_to_live(CATALOG_TTL)
        .build()
}

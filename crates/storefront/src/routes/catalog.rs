//! Catalog route handlers.
//!
//! Listing and detail responses come from the moka cache when warm; cache
//! misses fall through to the database.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, CacheValue};
use crate::db::CatalogRepository;
use crate::db::catalog::{Category, Product};
use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 24;
const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by category slug.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    pub per_page: Option<i64>,
}

/// A product with its formatted display price.
#[derive(Debug, Serialize)]
pub struct ProductPayload {
    #[serde(flatten)]
    pub product: Product,
    pub price_display: String,
}

impl From<Product> for ProductPayload {
    fn from(product: Product) -> Self {
        let price_display = product.unit_price().display();
        Self {
            product,
            price_display,
        }
    }
}

/// `GET /api/products` - paged product listing.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ProductPayload>>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * per_page;

    let key = CacheKey::Products {
        category_slug: query.category.clone(),
        limit: per_page,
        offset,
    };

    let products = if let Some(CacheValue::Products(products)) =
        state.catalog_cache().get(&key).await
    {
        products
    } else {
        let repo = CatalogRepository::new(state.pool());
        let products = repo
            .products(query.category.as_deref(), per_page, offset)
            .await?;
        state
            .catalog_cache()
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        products
    };

    let payload = products.into_iter().map(ProductPayload::from).collect();
    Ok(Json(ApiResponse::ok(payload)))
}

/// `GET /api/products/{slug}` - product detail.
pub async fn show_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductPayload>>> {
    let key = CacheKey::Product(slug.clone());

    let product = if let Some(CacheValue::Product(product)) = state.catalog_cache().get(&key).await
    {
        *product
    } else {
        let repo = CatalogRepository::new(state.pool());
        let product = repo
            .product_by_slug(&slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
        state
            .catalog_cache()
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        product
    };

    Ok(Json(ApiResponse::ok(ProductPayload::from(product))))
}

/// Query parameters for the per-category product listing.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    pub per_page: Option<i64>,
}

/// `GET /api/categories/{slug}/products` - products within one category.
pub async fn category_products(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<ProductPayload>>>> {
    let repo = CatalogRepository::new(state.pool());
    if repo.category_by_slug(&slug).await?.is_none() {
        return Err(AppError::NotFound("Category not found".to_owned()));
    }

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * per_page;

    let key = CacheKey::Products {
        category_slug: Some(slug.clone()),
        limit: per_page,
        offset,
    };

    let products = if let Some(CacheValue::Products(products)) =
        state.catalog_cache().get(&key).await
    {
        products
    } else {
        let products = repo.products(Some(&slug), per_page, offset).await?;
        state
            .catalog_cache()
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        products
    };

    let payload = products.into_iter().map(ProductPayload::from).collect();
    Ok(Json(ApiResponse::ok(payload)))
}

/// `GET /api/categories` - visible categories.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let key = CacheKey::Categories;

    let categories = if let Some(CacheValue::Categories(categories)) =
        state.catalog_cache().get(&key).await
    {
        categories
    } else {
        let repo = CatalogRepository::new(state.pool());
        let categories = repo.categories().await?;
        state
            .catalog_cache()
            .insert(key, CacheValue::Categories(categories.clone()))
            .await;
        categories
    };

    Ok(Json(ApiResponse::ok(categories)))
}

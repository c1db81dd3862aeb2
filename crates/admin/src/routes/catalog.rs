//! Catalog management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use dukkan_core::{AdminRole, CategoryId, ProductId};

use crate::db::CatalogAdminRepository;
use crate::db::catalog::{Category, CategoryInput, Product, ProductInput};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Body for category create and update.
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

/// Body for product create and update.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

const fn default_visible() -> bool {
    true
}

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Deletes are destructive and reserved for the super admin role; regular
/// operators hide entries instead.
fn require_super_admin(admin: &crate::models::CurrentAdmin) -> Result<()> {
    if admin.role == AdminRole::SuperAdmin {
        Ok(())
    } else {
        Err(AdminError::Forbidden(
            "Super admin role required".to_owned(),
        ))
    }
}

fn validate_slug(slug: &str) -> Result<()> {
    let ok = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(AdminError::Validation(
            "Slug must be lowercase ASCII letters, digits, and dashes".to_owned(),
        ))
    }
}

impl CategoryBody {
    fn into_input(self) -> Result<CategoryInput> {
        if self.name.trim().is_empty() {
            return Err(AdminError::Validation("Name is required".to_owned()));
        }
        validate_slug(&self.slug)?;
        Ok(CategoryInput {
            name: self.name,
            slug: self.slug,
            position: self.position,
            is_visible: self.is_visible,
        })
    }
}

impl ProductBody {
    fn into_input(self, currency_code: &str) -> Result<ProductInput> {
        if self.name.trim().is_empty() {
            return Err(AdminError::Validation("Name is required".to_owned()));
        }
        validate_slug(&self.slug)?;
        if self.price < Decimal::ZERO {
            return Err(AdminError::Validation("Price cannot be negative".to_owned()));
        }
        if self.stock < 0 {
            return Err(AdminError::Validation("Stock cannot be negative".to_owned()));
        }
        Ok(ProductInput {
            category_id: self.category_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            currency_code: currency_code.to_owned(),
            image_url: self.image_url,
            stock: self.stock,
            is_visible: self.is_visible,
        })
    }
}

/// `GET /api/categories` - all categories, hidden included.
pub async fn list_categories(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<Category>>>> {
    let categories = CatalogAdminRepository::new(state.pool()).categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}

/// `POST /api/categories` - create a category.
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>)> {
    let input = body.into_input()?;
    let category = CatalogAdminRepository::new(state.pool())
        .create_category(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(category))))
}

/// `PUT /api/categories/{id}` - update a category.
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CategoryId>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<ApiResponse<Category>>> {
    let input = body.into_input()?;
    let category = CatalogAdminRepository::new(state.pool())
        .update_category(id, &input)
        .await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// `DELETE /api/categories/{id}` - delete a category (super admin only).
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<ApiResponse<()>>> {
    require_super_admin(&admin)?;
    CatalogAdminRepository::new(state.pool())
        .delete_category(id)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// `GET /api/products` - all products, paged, hidden included.
pub async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let products = CatalogAdminRepository::new(state.pool())
        .products(per_page, (page - 1) * per_page)
        .await?;
    Ok(Json(ApiResponse::ok(products)))
}

/// `GET /api/products/{id}` - one product.
pub async fn show_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<Product>>> {
    let product = CatalogAdminRepository::new(state.pool())
        .get_product(id)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// `POST /api/products` - create a product.
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>)> {
    let input = body.into_input(state.config().currency.code())?;
    let product = CatalogAdminRepository::new(state.pool())
        .create_product(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// `PUT /api/products/{id}` - update a product.
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<ProductBody>,
) -> Result<Json<ApiResponse<Product>>> {
    let input = body.into_input(state.config().currency.code())?;
    let product = CatalogAdminRepository::new(state.pool())
        .update_product(id, &input)
        .await?;
    Ok(Json(ApiResponse::ok(product)))
}

/// `DELETE /api/products/{id}` - delete a product (super admin only; 409
/// if the product appears in orders).
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiResponse<()>>> {
    require_super_admin(&admin)?;
    CatalogAdminRepository::new(state.pool())
        .delete_product(id)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("olive-oil-1l").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Olive Oil").is_err());
        assert!(validate_slug("zايت").is_err());
    }
}

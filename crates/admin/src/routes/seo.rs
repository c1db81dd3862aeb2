//! SEO metadata route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::db::SeoAdminRepository;
use crate::db::seo::{SeoInput, SeoRecord};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `PUT /api/seo`.
#[derive(Debug, Deserialize)]
pub struct UpsertBody {
    pub path: String,
    pub title: String,
    pub description: Option<String>,
    pub og_image_url: Option<String>,
}

/// Query for `DELETE /api/seo`.
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub path: String,
}

fn validate_path(path: &str) -> Result<()> {
    if path.starts_with('/') && !path.contains(char::is_whitespace) {
        Ok(())
    } else {
        Err(AdminError::Validation(
            "Path must start with '/' and contain no whitespace".to_owned(),
        ))
    }
}

/// `GET /api/seo` - all records.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<SeoRecord>>>> {
    let records = SeoAdminRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::ok(records)))
}

/// `PUT /api/seo` - create or replace the record for a path.
pub async fn upsert(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<UpsertBody>,
) -> Result<Json<ApiResponse<SeoRecord>>> {
    validate_path(&body.path)?;
    if body.title.trim().is_empty() {
        return Err(AdminError::Validation("Title is required".to_owned()));
    }

    let input = SeoInput {
        path: body.path,
        title: body.title,
        description: body.description,
        og_image_url: body.og_image_url,
    };
    let record = SeoAdminRepository::new(state.pool()).upsert(&input).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// `DELETE /api/seo?path=/...` - drop the record for a path.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<ApiResponse<()>>> {
    validate_path(&query.path)?;
    SeoAdminRepository::new(state.pool())
        .delete(&query.path)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_validation() {
        assert!(validate_path("/products/olive-oil").is_ok());
        assert!(validate_path("products").is_err());
        assert!(validate_path("/has space").is_err());
    }
}

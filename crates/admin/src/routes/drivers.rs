//! Driver roster route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use dukkan_core::{DriverId, DriverStatus, Phone};

use crate::db::DriverRepository;
use crate::db::drivers::{Driver, DriverWithLoad};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /api/drivers`.
#[derive(Debug, Deserialize)]
pub struct CreateDriverBody {
    pub name: String,
    pub phone: String,
}

/// Body for `PUT /api/drivers/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateDriverBody {
    pub name: String,
    pub phone: String,
    pub status: DriverStatus,
}

fn validate_driver(name: &str, phone: &str) -> Result<Phone> {
    if name.trim().is_empty() {
        return Err(AdminError::Validation("Name is required".to_owned()));
    }
    Phone::parse(phone).map_err(|e| AdminError::Validation(e.to_string()))
}

/// `GET /api/drivers` - the roster with each driver's active order load.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<DriverWithLoad>>>> {
    let drivers = DriverRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::ok(drivers)))
}

/// `POST /api/drivers` - add a driver.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateDriverBody>,
) -> Result<(StatusCode, Json<ApiResponse<Driver>>)> {
    let phone = validate_driver(&body.name, &body.phone)?;
    let driver = DriverRepository::new(state.pool())
        .create(body.name.trim(), phone.as_str())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(driver))))
}

/// `PUT /api/drivers/{id}` - update details and availability.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DriverId>,
    Json(body): Json<UpdateDriverBody>,
) -> Result<Json<ApiResponse<Driver>>> {
    let phone = validate_driver(&body.name, &body.phone)?;
    let driver = DriverRepository::new(state.pool())
        .update(id, body.name.trim(), phone.as_str(), body.status)
        .await?;
    Ok(Json(ApiResponse::ok(driver)))
}

/// `DELETE /api/drivers/{id}` - remove a driver from the roster.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DriverId>,
) -> Result<Json<ApiResponse<()>>> {
    DriverRepository::new(state.pool()).delete(id).await?;
    Ok(Json(ApiResponse::ok(())))
}

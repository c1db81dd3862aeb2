//! Dashboard landing page data.

use axum::{Json, extract::State};

use crate::db::AnalyticsRepository;
use crate::db::analytics::DashboardCounts;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// `GET /api/dashboard` - headline counts.
pub async fn summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<DashboardCounts>>> {
    let counts = AnalyticsRepository::new(state.pool())
        .dashboard_counts()
        .await?;
    Ok(Json(ApiResponse::ok(counts)))
}

//! Analytics route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::AnalyticsRepository;
use crate::db::analytics::{DailySales, TopProduct, VitalSummary};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_WINDOW_DAYS: i64 = 30;
const MAX_WINDOW_DAYS: i64 = 365;
const TOP_PRODUCT_LIMIT: i64 = 10;

/// Query parameters for the analytics endpoints.
#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
    /// Restrict vitals aggregates to one route path.
    pub path: Option<String>,
}

impl WindowQuery {
    fn since(&self) -> chrono::DateTime<Utc> {
        let days = self
            .days
            .unwrap_or(DEFAULT_WINDOW_DAYS)
            .clamp(1, MAX_WINDOW_DAYS);
        Utc::now() - Duration::days(days)
    }
}

/// Sales report payload.
#[derive(Debug, Serialize)]
pub struct SalesReport {
    pub daily: Vec<DailySales>,
    pub top_products: Vec<TopProduct>,
}

/// `GET /api/analytics/sales?days=30` - per-day sales and best sellers.
pub async fn sales(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<SalesReport>>> {
    let since = query.since();
    let repo = AnalyticsRepository::new(state.pool());
    let daily = repo.daily_sales(since).await?;
    let top_products = repo.top_products(since, TOP_PRODUCT_LIMIT).await?;
    Ok(Json(ApiResponse::ok(SalesReport {
        daily,
        top_products,
    })))
}

/// `GET /api/analytics/vitals?days=30&path=/...` - aggregates per web
/// vitals metric, optionally filtered to one route path.
pub async fn vitals(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ApiResponse<Vec<VitalSummary>>>> {
    let summaries = AnalyticsRepository::new(state.pool())
        .vitals_summary(query.since(), query.path.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(summaries)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamping() {
        let now = Utc::now();
        let q = WindowQuery {
            days: Some(5000),
            path: None,
        };
        assert!(q.since() >= now - Duration::days(MAX_WINDOW_DAYS) - Duration::seconds(5));

        let q = WindowQuery {
            days: None,
            path: None,
        };
        let since = q.since();
        assert!(since <= now - Duration::days(DEFAULT_WINDOW_DAYS) + Duration::seconds(5));
    }
}

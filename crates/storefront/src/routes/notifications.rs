//! Notification route handlers. All require authentication.
//!
//! Real-time delivery happens over the push service; these endpoints serve
//! the durable records and read-state.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use dukkan_core::NotificationId;

use crate::db::NotificationRepository;
use crate::db::notifications::Notification;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Query parameters for the notification listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// Notification listing with the unread badge count.
#[derive(Debug, Serialize)]
pub struct NotificationsPayload {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// `GET /api/notifications` - recent notifications plus unread count.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<NotificationsPayload>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let repo = NotificationRepository::new(state.pool());
    let notifications = repo.list_for_user(user.id, limit).await?;
    let unread_count = repo.unread_count(user.id).await?;

    Ok(Json(ApiResponse::ok(NotificationsPayload {
        notifications,
        unread_count,
    })))
}

/// `POST /api/notifications/{id}/read` - mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<ApiResponse<()>>> {
    let changed = NotificationRepository::new(state.pool())
        .mark_read(id, user.id)
        .await?;

    if changed {
        Ok(Json(ApiResponse::ok(())))
    } else {
        Err(AppError::NotFound("Notification not found".to_owned()))
    }
}

/// `POST /api/notifications/read-all` - mark everything read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<()>>> {
    NotificationRepository::new(state.pool())
        .mark_all_read(user.id)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

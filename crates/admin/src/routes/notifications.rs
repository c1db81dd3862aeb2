//! Notification fan-out route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use dukkan_core::{NotificationChannel, UserId};

use crate::db::notifications::NotificationInput;
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::services::Notifier;
use crate::services::notifier::FanoutReport;
use crate::state::AppState;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_BODY_LENGTH: usize = 2000;

/// Body for `POST /api/notifications/broadcast`.
#[derive(Debug, Deserialize)]
pub struct BroadcastBody {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    #[serde(default)]
    pub channel: NotificationChannel,
}

/// Body for `POST /api/notifications/user`.
#[derive(Debug, Deserialize)]
pub struct NotifyUserBody {
    pub user_id: UserId,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    #[serde(default)]
    pub channel: NotificationChannel,
}

fn validate_content(title: &str, body: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AdminError::Validation("Title is required".to_owned()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(AdminError::Validation("Title is too long".to_owned()));
    }
    if body.trim().is_empty() {
        return Err(AdminError::Validation("Body is required".to_owned()));
    }
    if body.len() > MAX_BODY_LENGTH {
        return Err(AdminError::Validation("Body is too long".to_owned()));
    }
    Ok(())
}

/// `POST /api/notifications/broadcast` - send to every customer.
///
/// The durable inserts decide success; push and external delivery are
/// best-effort and reported back in the fan-out counts.
pub async fn broadcast(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<BroadcastBody>,
) -> Result<(StatusCode, Json<ApiResponse<FanoutReport>>)> {
    validate_content(&body.title, &body.body)?;

    let input = NotificationInput {
        title: body.title,
        body: body.body,
        link: body.link,
        channel: body.channel,
    };

    let notifier = Notifier::new(state.pool(), state.push(), state.whatsapp(), state.email());
    let report = notifier.broadcast(&input).await?;
    tracing::info!(
        admin_id = %admin.id,
        inserted = report.inserted,
        "broadcast sent",
    );
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(report))))
}

/// `POST /api/notifications/user` - send to one customer.
pub async fn notify_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<NotifyUserBody>,
) -> Result<(StatusCode, Json<ApiResponse<FanoutReport>>)> {
    validate_content(&body.title, &body.body)?;

    let input = NotificationInput {
        title: body.title,
        body: body.body,
        link: body.link,
        channel: body.channel,
    };

    let notifier = Notifier::new(state.pool(), state.push(), state.whatsapp(), state.email());
    let report = notifier
        .notify_user(body.user_id, &input)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AdminError::NotFound("Customer not found".to_owned())
            }
            other => AdminError::Database(other),
        })?;
    tracing::info!(admin_id = %admin.id, user_id = %body.user_id, "customer notified");
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(report))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_validation() {
        assert!(validate_content("عرض اليوم", "خصم ٢٠٪ على كل المنتجات").is_ok());
        assert!(validate_content("", "body").is_err());
        assert!(validate_content("title", "  ").is_err());
        assert!(validate_content(&"x".repeat(300), "body").is_err());
    }
}

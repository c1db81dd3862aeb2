//! Operator authentication route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::admin_users::AdminUser;
use crate::error::{AdminError, Result};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::response::ApiResponse;
use crate::services::AdminAuthService;
use crate::services::auth::AdminAuthError;
use crate::state::AppState;

/// Body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/login` - verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<AdminUser>>> {
    let auth = AdminAuthService::new(state.pool());
    let admin = auth.login(&body.email, &body.password).await.map_err(|e| {
        match e {
            AdminAuthError::InvalidCredentials => {
                AdminError::Unauthorized("Invalid credentials".to_owned())
            }
            AdminAuthError::Repository(err) => AdminError::Database(err),
            other => AdminError::Internal(other.to_string()),
        }
    })?;

    session
        .cycle_id()
        .await
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    let current = CurrentAdmin {
        id: admin.id,
        email: admin.email.clone(),
        role: admin.role,
    };
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    tracing::info!(admin_id = %admin.id, "operator logged in");
    Ok(Json(ApiResponse::ok(admin)))
}

/// `POST /api/auth/logout` - end the session.
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AdminError::Internal(e.to_string()))?;
    Ok(Json(ApiResponse::ok(())))
}

/// `GET /api/auth/me` - the signed-in operator's session identity.
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<ApiResponse<CurrentAdmin>> {
    Json(ApiResponse::ok(admin))
}

//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use dukkan_core::Phone;

use crate::db::CartRepository;
use crate::db::users::User;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::response::ApiResponse;
use crate::services::AuthService;
use crate::state::AppState;

/// Body for `POST /api/auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register` - create an account and sign in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<ApiResponse<User>>)> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }

    let phone = body
        .phone
        .as_deref()
        .map(Phone::parse)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let auth = AuthService::new(state.pool());
    let user = auth
        .register(&body.email, name, phone.as_ref(), &body.password)
        .await?;

    establish_session(&state, &session, &user).await?;
    tracing::info!(user_id = %user.id, "account registered");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

/// `POST /api/auth/login` - verify credentials and sign in.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<User>>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await?;

    establish_session(&state, &session, &user).await?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(ApiResponse::ok(user)))
}

/// `POST /api/auth/logout` - sign out.
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    clear_sentry_user();

    Ok(Json(ApiResponse::ok(())))
}

/// `GET /api/auth/me` - the signed-in user's session identity.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<ApiResponse<CurrentUser>> {
    Json(ApiResponse::ok(user))
}

/// Rotate the session, store the identity, and merge any guest cart into
/// the account cart.
async fn establish_session(state: &AppState, session: &Session, user: &User) -> Result<()> {
    // New session ID on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));

    // Merge the guest cart, if this browser had one
    let guest_token: Option<Uuid> = session
        .remove(session_keys::GUEST_CART_TOKEN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if let Some(token) = guest_token {
        CartRepository::new(state.pool())
            .merge_guest_into_user(token, user.id)
            .await?;
        tracing::debug!(user_id = %user.id, "guest cart merged");
    }

    Ok(())
}

//! Unified error handling for the admin API with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiResponse;

/// Application-level error type for the admin dashboard.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operator is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Operator lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Illegal state transition or duplicate submission.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message; internal details never leak.
    fn client_message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Internal server error".to_owned(),
            },
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }

    fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Database(
                    RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
                )
        )
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ApiResponse::<()>::failure(self.client_message());
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AdminError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            get_status(AdminError::Validation("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AdminError::Forbidden("role".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AdminError::Conflict("illegal transition".to_owned())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AdminError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AdminError::Internal("pool exhausted".to_owned());
        assert_eq!(err.client_message(), "Internal server error");
    }
}

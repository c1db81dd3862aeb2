//! JSON response envelope shared by every API route.
//!
//! Every endpoint answers `{ "success": true, "data": ... }` or
//! `{ "success": false, "error": "..." }`; status codes carry the error
//! class (400/401/404/409/500).

use serde::{Deserialize, Serialize};

/// The `{success, data | error}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Domain payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable error, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope around `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope with a client-facing message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_omits_error() {
        let json = serde_json::to_value(ApiResponse::ok(serde_json::json!({"id": 1}))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::failure("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "nope");
        assert!(json.get("data").is_none());
    }
}

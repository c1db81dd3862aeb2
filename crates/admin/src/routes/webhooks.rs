//! Inbound webhooks from external providers.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use crate::error::{AdminError, Result};
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-push-signature";

/// Delivery-status report from the push provider.
#[derive(Debug, Deserialize)]
struct PushDeliveryEvent {
    channel: String,
    event: String,
    status: String,
}

/// `POST /api/webhooks/push` - delivery-status callback from the push
/// service, authenticated by HMAC-SHA256 over the raw body.
///
/// Failed deliveries are only logged; the durable in-app records were
/// written before publish and are unaffected.
pub async fn push_delivery(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AdminError::Unauthorized("Missing webhook signature".to_owned()))?;

    if !state.push().verify_webhook(&body, signature) {
        return Err(AdminError::Unauthorized(
            "Invalid webhook signature".to_owned(),
        ));
    }

    let event: PushDeliveryEvent = serde_json::from_slice(&body)
        .map_err(|e| AdminError::Validation(format!("Malformed webhook body: {e}")))?;

    if event.status == "failed" {
        tracing::warn!(
            channel = %event.channel,
            event = %event.event,
            "push delivery reported failed",
        );
    } else {
        tracing::debug!(
            channel = %event.channel,
            event = %event.event,
            status = %event.status,
            "push delivery status",
        );
    }

    Ok(StatusCode::NO_CONTENT)
}

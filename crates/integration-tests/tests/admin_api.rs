//! Admin API integration tests.
//!
//! The HTTP tests need a migrated database with a provisioned operator
//! (`dukkan admin create ...`) and a running admin server; they are
//! ignored by default. Credentials come from `TEST_ADMIN_EMAIL` and
//! `TEST_ADMIN_PASSWORD`.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};

use dukkan_admin::config::PushConfig;
use dukkan_admin::services::PushClient;
use dukkan_admin::services::push::{BROADCAST_CHANNEL, user_channel};
use dukkan_core::{OrderStatus, UserId};
use dukkan_integration_tests::{admin_base_url, session_client};

// ============================================================================
// Order lifecycle contract (no server needed)
// ============================================================================

#[test]
fn test_every_status_pair_matches_the_state_graph() {
    use OrderStatus::{Cancelled, Confirmed, Delivered, OutForDelivery, Pending, Preparing};

    let all = [
        Pending,
        Confirmed,
        Preparing,
        OutForDelivery,
        Delivered,
        Cancelled,
    ];
    let allowed = [
        (Pending, Confirmed),
        (Confirmed, Preparing),
        (Preparing, OutForDelivery),
        (OutForDelivery, Delivered),
        (Pending, Cancelled),
        (Confirmed, Cancelled),
        (Preparing, Cancelled),
        (OutForDelivery, Cancelled),
    ];

    for from in all {
        for to in all {
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "transition {from:?} -> {to:?}"
            );
        }
    }
}

// ============================================================================
// Push channels and webhook signatures (no server needed)
// ============================================================================

#[test]
fn test_push_channel_naming() {
    assert_eq!(user_channel(UserId::new(42)), "user-42");
    assert_eq!(BROADCAST_CHANNEL, "store-broadcast");
}

#[test]
fn test_webhook_verification_end_to_end() {
    // A client configured with a webhook secret must accept the provider's
    // signed callback and reject everything else.
    let client = PushClient::new(PushConfig {
        api_base: "https://push.example.com".to_owned(),
        api_key: SecretString::from("publish-key"),
        webhook_secret: Some(SecretString::from("callback-secret")),
    });

    let body = br#"{"channel":"user-42","event":"notification","status":"delivered"}"#;

    // Signature produced the way the provider documents: HMAC-SHA256 of
    // the raw body, hex-encoded.
    use hmac::{Hmac, Mac};
    let mut mac = Hmac::<sha2::Sha256>::new_from_slice(b"callback-secret").unwrap();
    mac.update(body);
    let signature = hex::encode(mac.finalize().into_bytes());

    assert!(client.verify_webhook(body, &signature));
    assert!(!client.verify_webhook(b"different body", &signature));
    assert!(!client.verify_webhook(body, "deadbeef"));
}

// ============================================================================
// HTTP tests
// ============================================================================

async fn login(client: &Client, base: &str) -> Value {
    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "ops@dukkan.test".to_owned());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "test-operator-password".to_owned());

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK, "operator login failed");
    resp.json().await.unwrap()
}

#[tokio::test]
#[ignore = "Requires running admin server and provisioned operator"]
async fn test_unauthenticated_requests_are_rejected() {
    let client = session_client();
    let base = admin_base_url();

    for path in ["/api/dashboard", "/api/orders", "/api/drivers", "/api/seo"] {
        let resp = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server and provisioned operator"]
async fn test_dashboard_summary_after_login() {
    let client = session_client();
    let base = admin_base_url();
    login(&client, &base).await;

    let body: Value = client
        .get(format!("{base}/api/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["pending_orders"].is_i64());
    assert!(body["data"]["visible_products"].is_i64());
}

#[tokio::test]
#[ignore = "Requires running admin server and provisioned operator"]
async fn test_illegal_status_transition_is_conflict() {
    let client = session_client();
    let base = admin_base_url();
    login(&client, &base).await;

    let body: Value = client
        .get(format!("{base}/api/orders?status=pending"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let Some(order) = body["data"].as_array().unwrap().first() else {
        return; // nothing pending to test against
    };
    let id = order["id"].as_i64().unwrap();

    // pending -> delivered skips the whole pipeline.
    let resp = client
        .post(format!("{base}/api/orders/{id}/status"))
        .json(&json!({"status": "delivered"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running admin server and provisioned operator"]
async fn test_broadcast_reports_fanout_counts() {
    let client = session_client();
    let base = admin_base_url();
    login(&client, &base).await;

    let resp = client
        .post(format!("{base}/api/notifications/broadcast"))
        .json(&json!({
            "title": "عرض خاص",
            "body": "خصم ١٥٪ على كل المنتجات حتى نهاية الأسبوع",
            "channel": "in_app"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["inserted"].is_u64());
    assert!(body["data"]["push_delivered"].is_boolean());
}

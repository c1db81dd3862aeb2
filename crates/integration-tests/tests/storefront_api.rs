//! Storefront API integration tests.
//!
//! The HTTP tests need a migrated, seeded database and a running
//! storefront server; they are ignored by default.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use dukkan_integration_tests::{session_client, storefront_base_url};
use dukkan_storefront::response::ApiResponse;

// ============================================================================
// Envelope contract (no server needed)
// ============================================================================

#[test]
fn test_success_envelope_shape() {
    let envelope = ApiResponse::ok(json!({"id": 1, "slug": "olive-oil-1l"}));
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["slug"], "olive-oil-1l");
    assert!(value.get("error").is_none());
}

#[test]
fn test_failure_envelope_shape() {
    let envelope = ApiResponse::<()>::failure("Product not found");
    let value = serde_json::to_value(&envelope).unwrap();
    assert_eq!(value["success"], false);
    assert_eq!(value["error"], "Product not found");
    assert!(value.get("data").is_none());
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_health_endpoints() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_product_listing_hides_invisible_products() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .get(format!("{base}/api/products?per_page=100"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    for product in body["data"].as_array().unwrap() {
        assert_eq!(product["is_visible"], true);
        // Every product carries a formatted display price.
        assert!(product["price_display"].as_str().unwrap().contains("EGP"));
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_unknown_product_is_404_with_envelope() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .get(format!("{base}/api/products/no-such-slug"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

// ============================================================================
// Guest cart
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_guest_cart_survives_across_requests() {
    let client = session_client();
    let base = storefront_base_url();

    // Find a product to add.
    let body: Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let product_id = body["data"][0]["id"].as_i64().unwrap();

    // Add it as a guest; the session cookie carries the cart.
    let resp = client
        .post(format!("{base}/api/cart/items"))
        .json(&json!({"product_id": product_id, "quantity": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A fresh read on the same session sees the line.
    let body: Value = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["item_count"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_requires_authentication() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({"shipping": {
            "recipient_name": "اختبار",
            "phone": "+201001234567",
            "city": "القاهرة",
            "area": "مدينة نصر",
            "street": "شارع مصطفى النحاس"
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_leaves_a_durable_order_notification() {
    let client = session_client();
    let base = storefront_base_url();

    // Fresh account so the notification list starts empty.
    let email = format!(
        "checkout-{}@test.dukkan.store",
        std::time::UNIX_EPOCH.elapsed().unwrap().as_nanos()
    );
    let resp = client
        .post(format!("{base}/api/auth/register"))
        .json(&json!({
            "email": email,
            "name": "اختبار",
            "password": "correct horse battery staple",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let product_id = body["data"][0]["id"].as_i64().unwrap();

    client
        .post(format!("{base}/api/cart/items"))
        .json(&json!({"product_id": product_id, "quantity": 1}))
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({"shipping": {
            "recipient_name": "اختبار",
            "phone": "+201001234567",
            "city": "القاهرة",
            "area": "مدينة نصر",
            "street": "شارع مصطفى النحاس"
        }}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    let order_id = body["data"]["id"].as_i64().unwrap();

    // The in-app record is durable: it exists whether or not the push
    // relay or WhatsApp delivery succeeded.
    let body: Value = client
        .get(format!("{base}/api/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let notifications = body["data"]["notifications"].as_array().unwrap();
    assert!(notifications.iter().any(|n| {
        n["link"].as_str() == Some(format!("/orders/{order_id}").as_str())
    }));
}

// ============================================================================
// SEO surfaces
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_sitemap_and_robots() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client.get(format!("{base}/sitemap.xml")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<urlset"));

    let resp = client.get(format!("{base}/robots.txt")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Disallow: /api/"));
    assert!(body.contains("Sitemap:"));
}

// ============================================================================
// Web vitals ingestion
// ============================================================================

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_vitals_ingest_validates_metric_name() {
    let client = session_client();
    let base = storefront_base_url();

    let resp = client
        .post(format!("{base}/api/vitals"))
        .json(&json!({"metric": "LCP", "value": 1830.5, "rating": "good", "path": "/"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = client
        .post(format!("{base}/api/vitals"))
        .json(&json!({"metric": "MADE_UP", "value": 1.0, "rating": "good", "path": "/"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

//! HTTP route handlers for the admin dashboard API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Auth
//! POST /api/auth/login                  - Operator sign-in
//! POST /api/auth/logout                 - Sign out
//! GET  /api/auth/me                     - Current operator
//!
//! # Dashboard
//! GET  /api/dashboard                   - Headline counts
//!
//! # Catalog management
//! GET    /api/categories                - All categories (hidden included)
//! POST   /api/categories                - Create category
//! PUT    /api/categories/{id}           - Update category
//! DELETE /api/categories/{id}           - Delete category (super admin)
//! GET    /api/products                  - All products (paged)
//! POST   /api/products                  - Create product
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Update product
//! DELETE /api/products/{id}             - Delete product (super admin)
//!
//! # Orders
//! GET  /api/orders                      - List (paged, ?status=)
//! GET  /api/orders/{id}                 - Detail with items
//! POST /api/orders/{id}/status          - Transition status (409 on illegal)
//! POST /api/orders/{id}/assign          - Assign a driver
//!
//! # Drivers
//! GET    /api/drivers                   - List with active order load
//! POST   /api/drivers                   - Create
//! PUT    /api/drivers/{id}              - Update
//! DELETE /api/drivers/{id}              - Delete
//!
//! # Notifications
//! POST /api/notifications/broadcast     - Broadcast to all customers
//! POST /api/notifications/user          - Notify one customer
//!
//! # Webhooks
//! POST /api/webhooks/push               - Push delivery-status callback (HMAC)
//!
//! # SEO
//! GET    /api/seo                       - All records
//! PUT    /api/seo                       - Upsert by path
//! DELETE /api/seo                       - Delete by path
//!
//! # Analytics
//! GET  /api/analytics/sales             - Daily sales + top products
//! GET  /api/analytics/vitals            - Web vitals summaries (?days=, ?path=)
//! ```

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod drivers;
pub mod notifications;
pub mod orders;
pub mod seo;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the catalog management router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            put(catalog::update_category).delete(catalog::delete_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::show_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
}

/// Create the order management router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::transition_status))
        .route("/{id}/assign", post(orders::assign_driver))
}

/// Create the driver management router.
pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(drivers::index).post(drivers::create))
        .route("/{id}", put(drivers::update).delete(drivers::delete))
}

/// Create the notification router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/broadcast", post(notifications::broadcast))
        .route("/user", post(notifications::notify_user))
}

/// Create all routes for the admin dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .route("/api/dashboard", get(dashboard::summary))
        .merge(Router::new().nest("/api", catalog_routes()))
        .nest("/api/orders", order_routes())
        .nest("/api/drivers", driver_routes())
        .nest("/api/notifications", notification_routes())
        .route("/api/webhooks/push", post(webhooks::push_delivery))
        .route(
            "/api/seo",
            get(seo::index).put(seo::upsert).delete(seo::delete),
        )
        .route("/api/analytics/sales", get(analytics::sales))
        .route("/api/analytics/vitals", get(analytics::vitals))
}

//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (DB ping)
//!
//! # Catalog
//! GET  /api/products                    - Product listing (paged, ?category=)
//! GET  /api/products/{slug}             - Product detail
//! GET  /api/categories                  - Visible categories
//! GET  /api/categories/{slug}/products  - Products within a category (paged)
//!
//! # Cart (works for guests and signed-in users)
//! GET    /api/cart                      - Current cart with totals
//! POST   /api/cart/items                - Add a product
//! PATCH  /api/cart/items/{product_id}   - Adjust a line by a signed delta
//! DELETE /api/cart/items/{product_id}   - Remove a line
//! DELETE /api/cart                      - Empty the cart
//!
//! # Checkout (requires auth)
//! POST /api/checkout                    - Place an order from the cart
//!
//! # Auth
//! POST /api/auth/register               - Create an account
//! POST /api/auth/login                  - Sign in (merges guest cart)
//! POST /api/auth/logout                 - Sign out
//! GET  /api/auth/me                     - Current session user
//!
//! # Account (requires auth)
//! GET    /api/account                   - Profile
//! PATCH  /api/account                   - Update name/phone
//! GET    /api/account/addresses         - Address list
//! POST   /api/account/addresses         - Create address
//! PUT    /api/account/addresses/{id}    - Update address
//! DELETE /api/account/addresses/{id}    - Delete address
//! POST   /api/account/addresses/{id}/default - Make default
//!
//! # Orders (requires auth)
//! GET  /api/orders                      - Order history
//! GET  /api/orders/{id}                 - Order detail with items
//!
//! # Notifications (requires auth)
//! GET  /api/notifications               - Recent notifications + unread count
//! POST /api/notifications/{id}/read     - Mark one read
//! POST /api/notifications/read-all      - Mark all read
//!
//! # SEO & analytics
//! GET  /sitemap.xml                     - Sitemap from visible catalog
//! GET  /robots.txt                      - Robots policy
//! GET  /api/seo?path=/...               - Metadata for a route path
//! POST /api/vitals                      - Ingest a web vitals sample
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod notifications;
pub mod orders;
pub mod seo;
pub mod vitals;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{slug}", get(catalog::show_product))
        .route("/categories", get(catalog::list_categories))
        .route(
            "/categories/{slug}/products",
            get(catalog::category_products),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            patch(cart::update_item).delete(cart::remove_item),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::profile).patch(account::update_profile))
        .route(
            "/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route(
            "/addresses/{id}/default",
            post(account::set_default_address),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api", catalog_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::place_order))
        .nest(
            "/api/auth",
            auth_routes().layer(crate::middleware::auth_rate_limiter()),
        )
        .nest("/api/account", account_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/notifications", notification_routes())
        .route("/api/seo", get(seo::metadata))
        .route("/api/vitals", post(vitals::ingest))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
}

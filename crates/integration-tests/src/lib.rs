//! Integration test helpers for Dukkan.
//!
//! # Running Tests
//!
//! The library-level tests in `tests/` run standalone. The HTTP tests are
//! `#[ignore]`d and need a running stack:
//!
//! ```bash
//! # Migrate and seed a local database, then start both binaries
//! cargo run -p dukkan-cli -- migrate
//! cargo run -p dukkan-cli -- seed
//! cargo run -p dukkan-storefront &
//! cargo run -p dukkan-admin &
//!
//! cargo test -p dukkan-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// HTTP client with a cookie store, so sessions survive across requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed; acceptable in test code.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

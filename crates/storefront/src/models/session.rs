//! Session-related types.
//!
//! Types stored in the session for authentication and guest cart state.

use serde::{Deserialize, Serialize};

use dukkan_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub name: String,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the anonymous guest cart token.
    pub const GUEST_CART_TOKEN: &str = "guest_cart_token";
}

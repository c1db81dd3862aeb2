//! HTTP middleware for the admin dashboard.

pub mod auth;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use session::create_session_layer;

//! Session-stored operator identity.

use serde::{Deserialize, Serialize};

use dukkan_core::{AdminRole, AdminUserId, Email};

/// Minimal data stored in the session to identify the signed-in operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Operator's database ID.
    pub id: AdminUserId,
    /// Operator's email address.
    pub email: Email,
    /// Operator's role, checked for privileged operations.
    pub role: AdminRole,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the signed-in operator.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

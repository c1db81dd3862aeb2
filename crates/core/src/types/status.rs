//! Status enums for orders, drivers, notifications, and analytics.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders move forward through the fulfillment pipeline; `Cancelled` is
/// reachable from any non-terminal state. Terminal states accept no
/// further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,
    /// Confirmed by the store.
    Confirmed,
    /// Being prepared for dispatch.
    Preparing,
    /// Handed to a driver.
    OutForDelivery,
    /// Delivered to the customer (terminal).
    Delivered,
    /// Cancelled (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Whether this status accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether a transition from `self` to `next` is allowed.
    ///
    /// The pipeline only moves forward one step at a time; cancellation
    /// is allowed from any non-terminal state.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed)
            | (Self::Confirmed, Self::Preparing)
            | (Self::Preparing, Self::OutForDelivery)
            | (Self::OutForDelivery, Self::Delivered) => true,
            (
                Self::Pending | Self::Confirmed | Self::Preparing | Self::OutForDelivery,
                Self::Cancelled,
            ) => true,
            _ => false,
        }
    }
}

/// Driver availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "driver_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    /// Free to take a delivery.
    #[default]
    Available,
    /// Currently on a delivery.
    Busy,
    /// Not working.
    Offline,
}

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "notification_channel", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    /// Durable in-app record (always written).
    #[default]
    InApp,
    /// Real-time push over the hosted pub/sub service.
    Push,
    /// WhatsApp Business message.
    Whatsapp,
    /// Transactional email.
    Email,
}

/// Web-vitals rating buckets, per the standard thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "web_vital_rating", rename_all = "snake_case")
)]
#[serde(rename_all = "kebab-case")]
pub enum WebVitalRating {
    Good,
    NeedsImprovement,
    Poor,
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin-user management.
    SuperAdmin,
    /// Day-to-day store management.
    #[default]
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_steps() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn test_no_moving_backwards() {
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn test_cancellation_from_non_terminal() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_serde_rename() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).expect("serialize");
        assert_eq!(json, "\"out_for_delivery\"");
        let json = serde_json::to_string(&WebVitalRating::NeedsImprovement).expect("serialize");
        assert_eq!(json, "\"needs-improvement\"");
    }
}

//! Order management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use dukkan_core::{DriverId, DriverStatus, NotificationChannel, OrderId, OrderStatus};

use crate::db::{DriverRepository, OrderAdminRepository};
use crate::db::notifications::NotificationInput;
use crate::db::orders::{AdminOrder, AdminOrderItem};
use crate::error::{AdminError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiResponse;
use crate::services::Notifier;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Body for `POST /api/orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub status: OrderStatus,
}

/// Body for `POST /api/orders/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub driver_id: DriverId,
}

/// An order together with its line items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: AdminOrder,
    pub items: Vec<AdminOrderItem>,
}

/// `GET /api/orders` - newest first, paged, optionally filtered by status.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<AdminOrder>>>> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let orders = OrderAdminRepository::new(state.pool())
        .list(query.status, per_page, (page - 1) * per_page)
        .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// `GET /api/orders/{id}` - one order with its items.
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<OrderDetail>>> {
    let repo = OrderAdminRepository::new(state.pool());
    let order = repo.get(id).await?;
    let items = repo.items(id).await?;
    Ok(Json(ApiResponse::ok(OrderDetail { order, items })))
}

/// `POST /api/orders/{id}/status` - advance or cancel an order.
///
/// Illegal transitions (skipping steps, moving backwards, leaving a
/// terminal state) are rejected with 409. On success the customer is
/// notified; when the order reaches a terminal state its driver is
/// released if they hold no other active order.
pub async fn transition_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<TransitionBody>,
) -> Result<Json<ApiResponse<AdminOrder>>> {
    let repo = OrderAdminRepository::new(state.pool());
    let order = repo.get(id).await?;

    if !order.status.can_transition_to(body.status) {
        return Err(AdminError::Conflict(format!(
            "Order cannot move from {} to {}",
            status_label(order.status),
            status_label(body.status),
        )));
    }

    let updated = repo.set_status(id, body.status).await?;
    tracing::info!(
        order_id = %id,
        admin_id = %admin.id,
        from = status_label(order.status),
        to = status_label(body.status),
        "order status changed",
    );

    if body.status.is_terminal()
        && let Some(driver_id) = updated.driver_id
    {
        repo.release_driver(driver_id).await?;
    }

    notify_customer(&state, &updated).await;

    Ok(Json(ApiResponse::ok(updated)))
}

/// `POST /api/orders/{id}/assign` - hand the order to a driver.
///
/// Assignment is itself the transition out for delivery, so the order
/// must be in preparation. The driver gets a WhatsApp dispatch message
/// and the customer is notified, both best-effort.
pub async fn assign_driver(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(body): Json<AssignBody>,
) -> Result<Json<ApiResponse<AdminOrder>>> {
    let repo = OrderAdminRepository::new(state.pool());
    let order = repo.get(id).await?;

    if order.status != OrderStatus::Preparing {
        return Err(AdminError::Conflict(
            "Only orders in preparation can be assigned a driver".to_owned(),
        ));
    }

    let driver = DriverRepository::new(state.pool()).get(body.driver_id).await?;
    if driver.status != DriverStatus::Available {
        return Err(AdminError::Conflict("Driver is not available".to_owned()));
    }

    repo.assign_driver(id, body.driver_id).await?;
    tracing::info!(
        order_id = %id,
        driver_id = %body.driver_id,
        admin_id = %admin.id,
        "driver assigned",
    );

    let updated = repo.get(id).await?;
    dispatch_driver(&state, &updated, &driver.phone).await;
    notify_customer(&state, &updated).await;

    Ok(Json(ApiResponse::ok(updated)))
}

/// WhatsApp the driver their pickup details. Best-effort.
async fn dispatch_driver(state: &AppState, order: &AdminOrder, driver_phone: &str) {
    let Some(whatsapp) = state.whatsapp() else {
        return;
    };
    let message = format!(
        "توصيل جديد: طلب #{} إلى {}، {}، {}. العميل: {} ({})",
        order.id, order.city, order.area, order.street, order.recipient_name, order.phone,
    );
    if let Err(e) = whatsapp.send_text(driver_phone, &message).await {
        tracing::warn!(order_id = %order.id, error = %e, "driver dispatch message failed");
    }
}

/// Tell the customer their order moved. Best-effort: a delivery failure
/// is logged, never surfaced to the operator as an error.
///
/// Confirmation also goes out as email when SMTP is configured; every
/// other step is WhatsApp to the phone on file, on top of push plus the
/// in-app record.
async fn notify_customer(state: &AppState, order: &AdminOrder) {
    let channel = if order.status == OrderStatus::Confirmed {
        NotificationChannel::Email
    } else {
        NotificationChannel::Whatsapp
    };
    let input = NotificationInput {
        title: format!("تحديث الطلب #{}", order.id),
        body: customer_message(order.status),
        link: Some(format!("/orders/{}", order.id)),
        channel,
    };

    let notifier = Notifier::new(state.pool(), state.push(), state.whatsapp(), state.email());
    if let Err(e) = notifier.notify_user(order.user_id, &input).await {
        tracing::warn!(order_id = %order.id, error = %e, "customer status notification failed");
    }
}

const fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Preparing => "preparing",
        OrderStatus::OutForDelivery => "out_for_delivery",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn customer_message(status: OrderStatus) -> String {
    match status {
        OrderStatus::Pending => "تم استلام طلبك وهو قيد المراجعة.",
        OrderStatus::Confirmed => "تم تأكيد طلبك وسنبدأ في تجهيزه.",
        OrderStatus::Preparing => "طلبك قيد التجهيز الآن.",
        OrderStatus::OutForDelivery => "طلبك في الطريق إليك!",
        OrderStatus::Delivered => "تم توصيل طلبك. شكراً لتسوقك معنا!",
        OrderStatus::Cancelled => "تم إلغاء طلبك. تواصل معنا لأي استفسار.",
    }
    .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_match_wire_format() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::OutForDelivery,
            OrderStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status_label(status)));
        }
    }
}

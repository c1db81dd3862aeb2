//! Checkout: turn the signed-in user's cart into an order.
//!
//! Placing an order is transactional in the database; the push event and
//! WhatsApp confirmation afterwards are best-effort and never fail the
//! request.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use dukkan_core::{AddressId, Phone};

use crate::db::{AddressRepository, NotificationRepository, OrderRepository};
use crate::db::orders::{Order, ShippingDetails};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Push channel the admin dashboard subscribes to for live order events.
const ORDERS_CHANNEL: &str = "admin-orders";

/// Body for `POST /api/checkout`.
///
/// Either reference a saved address or supply shipping details inline.
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub address_id: Option<AddressId>,
    pub shipping: Option<ShippingBody>,
}

/// Inline shipping details for guests-turned-users without saved addresses.
#[derive(Debug, Deserialize)]
pub struct ShippingBody {
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
}

/// `POST /api/checkout` - place an order from the current cart.
///
/// Returns `409` when the cart is empty.
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CheckoutBody>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>)> {
    let shipping = resolve_shipping(&state, &user, body).await?;

    let cart = super::cart::current_cart(&state, &session, Some(&user)).await?;

    let order = OrderRepository::new(state.pool())
        .create_from_cart(
            user.id,
            cart.id,
            state.config().currency.code(),
            &shipping,
        )
        .await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, total = %order.total, "order placed");

    notify_order_placed(&state, &order, &shipping).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(order))))
}

/// Resolve shipping details from a saved address or the inline body.
async fn resolve_shipping(
    state: &AppState,
    user: &crate::models::CurrentUser,
    body: CheckoutBody,
) -> Result<ShippingDetails> {
    if let Some(address_id) = body.address_id {
        let address = AddressRepository::new(state.pool())
            .get_for_user(address_id, user.id)
            .await?;
        return Ok(ShippingDetails {
            recipient_name: address.recipient_name,
            phone: address.phone,
            city: address.city,
            area: address.area,
            street: address.street,
            building: address.building,
            apartment: address.apartment,
            notes: address.notes,
        });
    }

    let Some(shipping) = body.shipping else {
        return Err(AppError::Validation(
            "Either address_id or shipping details are required".to_owned(),
        ));
    };

    let phone =
        Phone::parse(&shipping.phone).map_err(|e| AppError::Validation(e.to_string()))?;

    for (field, value) in [
        ("recipient_name", &shipping.recipient_name),
        ("city", &shipping.city),
        ("area", &shipping.area),
        ("street", &shipping.street),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    Ok(ShippingDetails {
        recipient_name: shipping.recipient_name,
        phone: phone.as_str().to_owned(),
        city: shipping.city,
        area: shipping.area,
        street: shipping.street,
        building: shipping.building,
        apartment: shipping.apartment,
        notes: shipping.notes,
    })
}

/// Title, body, and link for the customer's order-placed record.
fn order_placed_notification(order: &Order) -> (String, String, String) {
    (
        format!("تم استلام طلبك #{}", order.id),
        format!(
            "شكراً لطلبك! رقم الطلب #{} بإجمالي {} {}. سنتواصل معك عند الشحن.",
            order.id, order.total, order.currency_code
        ),
        format!("/orders/{}", order.id),
    )
}

/// Side channels after an order lands: the customer's durable in-app
/// record first, then a push event for the admin dashboard and a WhatsApp
/// confirmation. The insert comes before any delivery attempt so a dead
/// push service never loses the record; each step is best-effort and
/// never fails the request.
async fn notify_order_placed(state: &AppState, order: &Order, shipping: &ShippingDetails) {
    let (title, body, link) = order_placed_notification(order);
    if let Err(e) = NotificationRepository::new(state.pool())
        .insert(order.user_id, &title, &body, Some(&link))
        .await
    {
        tracing::warn!(order_id = %order.id, error = %e, "order notification insert failed");
    }

    let payload = serde_json::json!({
        "order_id": order.id,
        "total": order.total,
        "currency_code": order.currency_code,
        "city": order.city,
    });

    if let Err(e) = state
        .push()
        .publish(ORDERS_CHANNEL, "order-placed", &payload)
        .await
    {
        tracing::warn!(order_id = %order.id, error = %e, "push publish failed");
    }

    if let Some(whatsapp) = state.whatsapp()
        && let Ok(phone) = Phone::parse(&shipping.phone)
        && let Err(e) = whatsapp.send_text(&phone, &body).await
    {
        tracing::warn!(order_id = %order.id, error = %e, "whatsapp confirmation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dukkan_core::{OrderId, OrderStatus, UserId};
    use rust_decimal::Decimal;

    fn placed_order() -> Order {
        Order {
            id: OrderId::from(41),
            user_id: UserId::from(7),
            status: OrderStatus::Pending,
            total: Decimal::new(24500, 2),
            currency_code: "EGP".to_owned(),
            recipient_name: "منى".to_owned(),
            phone: "+201001234567".to_owned(),
            city: "القاهرة".to_owned(),
            area: "مدينة نصر".to_owned(),
            street: "شارع الطيران".to_owned(),
            building: None,
            apartment: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_order_placed_notification_references_the_order() {
        let order = placed_order();
        let (title, body, link) = order_placed_notification(&order);

        assert!(title.contains("#41"));
        assert!(body.contains("#41"));
        assert!(body.contains("245.00"));
        assert!(body.contains("EGP"));
        assert_eq!(link, "/orders/41");
    }
}

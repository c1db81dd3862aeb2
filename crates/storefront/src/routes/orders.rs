//! Order history route handlers. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use dukkan_core::OrderId;

use crate::db::OrderRepository;
use crate::db::orders::{Order, OrderItem};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// An order with its line items.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// `GET /api/orders` - the user's order history, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<Vec<Order>>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(ApiResponse::ok(orders)))
}

/// `GET /api/orders/{id}` - one order with its items, owner-scoped.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<ApiResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.pool());
    let order = repo.get_for_user(id, user.id).await?;
    let items = repo.items(order.id).await?;
    Ok(Json(ApiResponse::ok(OrderDetail { order, items })))
}

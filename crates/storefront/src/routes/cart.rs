//! Cart route handlers.
//!
//! Every handler works for both signed-in users and guests. Guests get a
//! random cart token stored in their session; at login the guest cart is
//! merged into the account cart.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

use dukkan_core::ProductId;

use crate::db::CartRepository;
use crate::db::carts::{Cart, CartLine};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::session_keys;
use crate::response::ApiResponse;
use crate::state::AppState;

/// A cart line with its computed subtotal.
#[derive(Debug, Serialize)]
pub struct CartLinePayload {
    #[serde(flatten)]
    pub line: CartLine,
    pub subtotal: Decimal,
}

/// The full cart view returned by every cart mutation.
#[derive(Debug, Serialize)]
pub struct CartPayload {
    pub items: Vec<CartLinePayload>,
    pub item_count: i64,
    pub total: Decimal,
    pub currency_code: String,
}

/// Body for `POST /api/cart/items`.
#[derive(Debug, Deserialize)]
pub struct AddItemBody {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

/// Body for `PATCH /api/cart/items/{product_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemBody {
    pub delta: i32,
}

/// Resolve the cart for the current session: the user's cart when signed
/// in, otherwise a guest cart keyed by a session-stored token.
pub(crate) async fn current_cart(
    state: &AppState,
    session: &Session,
    user: Option<&crate::models::CurrentUser>,
) -> Result<Cart> {
    let repo = CartRepository::new(state.pool());

    if let Some(user) = user {
        return Ok(repo.get_or_create_for_user(user.id).await?);
    }

    let token: Uuid = match session
        .get::<Uuid>(session_keys::GUEST_CART_TOKEN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    {
        Some(token) => token,
        None => {
            let token = Uuid::new_v4();
            session
                .insert(session_keys::GUEST_CART_TOKEN, token)
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?;
            token
        }
    };

    Ok(repo.get_or_create_for_guest(token).await?)
}

/// Build the cart payload from its lines.
async fn cart_payload(state: &AppState, cart: &Cart) -> Result<CartPayload> {
    let repo = CartRepository::new(state.pool());
    let lines = repo.lines(cart.id).await?;

    let item_count = lines.iter().map(|l| i64::from(l.quantity)).sum();
    let total = lines.iter().map(CartLine::subtotal).sum();

    let items = lines
        .into_iter()
        .map(|line| {
            let subtotal = line.subtotal();
            CartLinePayload { line, subtotal }
        })
        .collect();

    Ok(CartPayload {
        items,
        item_count,
        total,
        currency_code: state.config().currency.code().to_owned(),
    })
}

/// `GET /api/cart` - the current cart with totals.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<ApiResponse<CartPayload>>> {
    let cart = current_cart(&state, &session, user.as_ref()).await?;
    let payload = cart_payload(&state, &cart).await?;
    Ok(Json(ApiResponse::ok(payload)))
}

/// `POST /api/cart/items` - add a product to the cart.
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Json(body): Json<AddItemBody>,
) -> Result<(StatusCode, Json<ApiResponse<CartPayload>>)> {
    if body.quantity < 1 {
        return Err(AppError::Validation(
            "Quantity must be at least 1".to_owned(),
        ));
    }

    let cart = current_cart(&state, &session, user.as_ref()).await?;
    let repo = CartRepository::new(state.pool());

    repo.add_item(cart.id, body.product_id, body.quantity)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Product unavailable".to_owned())
            }
            other => other.into(),
        })?;

    let payload = cart_payload(&state, &cart).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(payload))))
}

/// `PATCH /api/cart/items/{product_id}` - adjust a line's quantity by a
/// signed delta.
///
/// A line whose quantity drops to zero is removed.
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateItemBody>,
) -> Result<Json<ApiResponse<CartPayload>>> {
    if body.delta == 0 {
        return Err(AppError::Validation(
            "Delta must be non-zero".to_owned(),
        ));
    }

    let cart = current_cart(&state, &session, user.as_ref()).await?;
    let repo = CartRepository::new(state.pool());

    repo.adjust_item(cart.id, product_id, body.delta)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Item not in cart".to_owned())
            }
            other => other.into(),
        })?;

    let payload = cart_payload(&state, &cart).await?;
    Ok(Json(ApiResponse::ok(payload)))
}

/// `DELETE /api/cart/items/{product_id}` - remove a line.
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiResponse<CartPayload>>> {
    let cart = current_cart(&state, &session, user.as_ref()).await?;
    let repo = CartRepository::new(state.pool());

    repo.remove_item(cart.id, product_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("Item not in cart".to_owned())
            }
            other => other.into(),
        })?;

    let payload = cart_payload(&state, &cart).await?;
    Ok(Json(ApiResponse::ok(payload)))
}

/// `DELETE /api/cart` - empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<ApiResponse<CartPayload>>> {
    let cart = current_cart(&state, &session, user.as_ref()).await?;
    let repo = CartRepository::new(state.pool());

    repo.clear(cart.id).await?;

    let payload = cart_payload(&state, &cart).await?;
    Ok(Json(ApiResponse::ok(payload)))
}

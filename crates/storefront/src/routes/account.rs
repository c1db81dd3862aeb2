//! Account and address route handlers. All require authentication.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use dukkan_core::{AddressId, Phone};

use crate::db::{AddressRepository, UserRepository};
use crate::db::addresses::{Address, AddressInput};
use crate::db::users::User;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body for `PATCH /api/account`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileBody {
    pub name: String,
    pub phone: Option<String>,
}

/// Body for address create and update.
#[derive(Debug, Deserialize)]
pub struct AddressBody {
    pub label: String,
    pub recipient_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub notes: Option<String>,
}

impl AddressBody {
    fn into_input(self) -> Result<AddressInput> {
        let phone = Phone::parse(&self.phone).map_err(|e| AppError::Validation(e.to_string()))?;

        for (field, value) in [
            ("label", &self.label),
            ("recipient_name", &self.recipient_name),
            ("city", &self.city),
            ("area", &self.area),
            ("street", &self.street),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} is required")));
            }
        }

        Ok(AddressInput {
            label: self.label,
            recipient_name: self.recipient_name,
            phone: phone.as_str().to_owned(),
            city: self.city,
            area: self.area,
            street: self.street,
            building: self.building,
            apartment: self.apartment,
            notes: self.notes,
        })
    }
}

/// `GET /api/account` - the signed-in user's profile.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<User>>> {
    let profile = UserRepository::new(state.pool()).get_by_id(user.id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// `PATCH /api/account` - update name and phone.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<ApiResponse<User>>> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_owned()));
    }

    let phone = body
        .phone
        .as_deref()
        .map(Phone::parse)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, name, phone.as_ref())
        .await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// `GET /api/account/addresses` - list addresses, default first.
pub async fn list_addresses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ApiResponse<Vec<Address>>>> {
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(ApiResponse::ok(addresses)))
}

/// `POST /api/account/addresses` - create an address.
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<AddressBody>,
) -> Result<(StatusCode, Json<ApiResponse<Address>>)> {
    let input = body.into_input()?;
    let address = AddressRepository::new(state.pool())
        .create(user.id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(address))))
}

/// `PUT /api/account/addresses/{id}` - update an address.
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(body): Json<AddressBody>,
) -> Result<Json<ApiResponse<Address>>> {
    let input = body.into_input()?;
    let address = AddressRepository::new(state.pool())
        .update(id, user.id, &input)
        .await?;
    Ok(Json(ApiResponse::ok(address)))
}

/// `DELETE /api/account/addresses/{id}` - delete an address.
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<ApiResponse<()>>> {
    AddressRepository::new(state.pool())
        .delete(id, user.id)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

/// `POST /api/account/addresses/{id}/default` - make an address the
/// default, demoting the previous one atomically.
pub async fn set_default_address(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<ApiResponse<()>>> {
    AddressRepository::new(state.pool())
        .set_default(id, user.id)
        .await?;
    Ok(Json(ApiResponse::ok(())))
}

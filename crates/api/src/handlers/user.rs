//! Handlers for the caller's own profile (`/users/me`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_db::models::owner::UpdateOwnerBusiness;
use gharpayy_db::models::tenant::TenantPreferences;
use gharpayy_db::models::user::UpdateProfile;
use gharpayy_db::repositories::{OwnerRepo, TenantRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireOwner, RequireTenant};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `PUT /users/me/business`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 200))]
    pub business_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub license_number: Option<String>,
}

/// PUT /api/v1/users/me
///
/// Replace name, phone number and profile image. Role cannot be changed.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let user = UserRepo::update_profile(&state.pool, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");
    Ok(Json(DataResponse { data: user }))
}

/// GET /api/v1/users/me/tenant
pub async fn get_tenant_profile(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tenant = TenantRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tenant",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse { data: tenant }))
}

/// PUT /api/v1/users/me/preferences
pub async fn update_preferences(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Json(prefs): Json<TenantPreferences>,
) -> AppResult<impl IntoResponse> {
    if let Some(max_rent) = prefs.max_rent {
        gharpayy_core::validation::validate_amount("max_rent", max_rent)?;
    }

    let tenant = TenantRepo::update_preferences(&state.pool, auth.user_id, &prefs)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tenant",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = auth.user_id, "Tenant preferences updated");
    Ok(Json(DataResponse { data: tenant }))
}

/// GET /api/v1/users/me/owner
pub async fn get_owner_profile(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let owner = OwnerRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Owner",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse { data: owner }))
}

/// PUT /api/v1/users/me/business
///
/// Changing the license number does not reset verification; an admin
/// re-verifies explicitly.
pub async fn update_business(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Json(input): Json<UpdateBusinessRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let update = UpdateOwnerBusiness {
        business_name: input.business_name,
        license_number: input.license_number,
    };
    let owner = OwnerRepo::update_business(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Owner",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = auth.user_id, "Owner business details updated");
    Ok(Json(DataResponse { data: owner }))
}

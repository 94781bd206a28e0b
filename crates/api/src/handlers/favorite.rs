//! Handlers for the tenant's favorites (`/favorites`).
//!
//! Adding and removing are idempotent.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::types::DbId;
use gharpayy_db::repositories::FavoriteRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireTenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/favorites
///
/// Favorite listings that still exist.
pub async fn list_favorites(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let listings = FavoriteRepo::list(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/favorites/ids
pub async fn list_favorite_ids(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let ids = FavoriteRepo::list_ids(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: ids }))
}

/// PUT /api/v1/favorites/{listing_id}
pub async fn add_favorite(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ids = FavoriteRepo::add(&state.pool, auth.user_id, listing_id).await?;
    tracing::debug!(tenant_id = auth.user_id, listing_id, "Favorite added");
    Ok(Json(DataResponse { data: ids }))
}

/// DELETE /api/v1/favorites/{listing_id}
pub async fn remove_favorite(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ids = FavoriteRepo::remove(&state.pool, auth.user_id, listing_id).await?;
    tracing::debug!(tenant_id = auth.user_id, listing_id, "Favorite removed");
    Ok(Json(DataResponse { data: ids }))
}

//! Handlers for the `/admin` resource: user management, owner
//! verification, listing moderation and the event log.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::repositories::{EventRepo, ListingRepo, OwnerRepo, UserRepo};
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::SignUpRequest;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default and maximum page size for the event log.
const DEFAULT_EVENT_LIMIT: i64 = 100;
const MAX_EVENT_LIMIT: i64 = 500;

/// Query parameters for `GET /admin/users`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<Role>,
}

/// Query parameters for `GET /admin/events`.
#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub event_type: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool, params.role).await?;
    Ok(Json(DataResponse { data: users }))
}

/// POST /api/v1/admin/users
///
/// Create an account of any role, including admin.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = state
        .identity
        .create_user(input.into(), Some(admin.user_id))
        .await?;
    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.user_id, "User created by admin");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/admin/owners/{id}/verify-license
///
/// Marks both the license and the user as verified.
pub async fn verify_owner_license(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(owner_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let owner = OwnerRepo::verify_license(&state.pool, owner_id).await?;
    tracing::info!(owner_id, admin_id = admin.user_id, "Owner license verified");
    Ok(Json(DataResponse { data: owner }))
}

// ---------------------------------------------------------------------------
// Listing moderation
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/listings/pending
///
/// Active listings awaiting approval, oldest first.
pub async fn pending_listings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let listings = ListingRepo::list_pending(&state.pool).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/admin/listings/{id}/approve
pub async fn approve_listing(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::approve(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    tracing::info!(listing_id, admin_id = admin.user_id, "Listing approved");
    state.event_bus.publish(
        PlatformEvent::new(event_types::LISTING_APPROVED)
            .with_source("listing", listing.id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({ "owner_id": listing.owner_id })),
    );

    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/admin/listings/{id}/reject
///
/// Rejection also deactivates the listing.
pub async fn reject_listing(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::reject(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    tracing::info!(listing_id, admin_id = admin.user_id, "Listing rejected");
    state.event_bus.publish(
        PlatformEvent::new(event_types::LISTING_REJECTED)
            .with_source("listing", listing.id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({ "owner_id": listing.owner_id })),
    );

    Ok(Json(DataResponse { data: listing }))
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/events
///
/// Most recent persisted events, newest first.
pub async fn list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_EVENT_LIMIT)
        .clamp(1, MAX_EVENT_LIMIT);
    let events = EventRepo::list_recent(&state.pool, params.event_type.as_deref(), limit).await?;
    Ok(Json(DataResponse { data: events }))
}

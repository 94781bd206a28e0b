//! Handlers for the `/listings` resource.
//!
//! Tenants only ever see approved, active listings. Owners manage their own
//! listings; admins may act on any.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_core::listing::{is_visible_to_tenants, Amenity, ListingFilter, RoomType};
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::listing::{CreateListing, Listing, UpdateListing};
use gharpayy_db::repositories::{BookingRepo, InquiryRepo, ListingRepo};
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOwner;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /listings`.
///
/// `amenities` is a comma-separated list, e.g. `wifi,ac`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingSearchParams {
    pub max_rent: Option<f64>,
    pub room_type: Option<RoomType>,
    pub city: Option<String>,
    pub amenities: Option<String>,
    pub q: Option<String>,
}

impl ListingSearchParams {
    fn into_filter(self) -> AppResult<ListingFilter> {
        let amenities = match self.amenities.as_deref() {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<Amenity>().map_err(CoreError::from))
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(ListingFilter {
            max_rent: self.max_rent,
            room_type: self.room_type,
            city: self.city,
            amenities,
            q: self.q,
        })
    }
}

/// Body for `POST /listings/{id}/rooms`.
#[derive(Debug, Deserialize)]
pub struct AdjustRoomsRequest {
    /// `-1` takes a room, `+1` gives one back.
    pub delta: i32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a listing the caller may manage: its owner, or any admin.
pub(crate) async fn load_managed_listing(
    state: &AppState,
    auth: &AuthUser,
    listing_id: DbId,
) -> AppResult<Listing> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    if !auth.is_admin() && listing.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this listing".into(),
        )));
    }
    Ok(listing)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// Publish a listing. It starts unapproved and waits for an admin.
pub async fn create_listing(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Json(input): Json<CreateListing>,
) -> AppResult<impl IntoResponse> {
    match auth.role {
        Role::Owner => {}
        Role::Admin | Role::Tenant => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only owners can publish listings".into(),
            )))
        }
    }
    input.validate()?;

    let listing = ListingRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(listing_id = listing.id, owner_id = auth.user_id, "Listing created");
    state.event_bus.publish(
        PlatformEvent::new(event_types::LISTING_CREATED)
            .with_source("listing", listing.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "city": listing.city, "rent": listing.rent })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// GET /api/v1/listings
///
/// Tenant-facing search over approved, active listings, newest first.
pub async fn search_listings(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListingSearchParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.into_filter()?;
    let listings = ListingRepo::list_visible(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/mine
pub async fn my_listings(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let listings = ListingRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/{id}
///
/// Hidden listings are reported as missing to everyone but their owner and
/// admins.
pub async fn get_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .filter(|l| match auth.role {
            Role::Admin => true,
            Role::Owner if l.owner_id == auth.user_id => true,
            Role::Owner | Role::Tenant => is_visible_to_tenants(l.is_approved, l.is_active),
        })
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    Ok(Json(DataResponse { data: listing }))
}

/// PUT /api/v1/listings/{id}
///
/// Replace the editable fields. Changing `total_rooms` shifts
/// `available_rooms` by the same amount.
pub async fn update_listing(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<UpdateListing>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_managed_listing(&state, &auth, listing_id).await?;

    let listing = ListingRepo::update(&state.pool, listing_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }))?;

    tracing::info!(listing_id, user_id = auth.user_id, "Listing updated");
    Ok(Json(DataResponse { data: listing }))
}

/// DELETE /api/v1/listings/{id}
pub async fn delete_listing(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_managed_listing(&state, &auth, listing_id).await?;

    if !ListingRepo::delete(&state.pool, listing_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        }));
    }

    tracing::info!(listing_id, user_id = auth.user_id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/listings/{id}/rooms
///
/// Manually take or release rooms, e.g. for an offline rental.
pub async fn adjust_rooms(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<AdjustRoomsRequest>,
) -> AppResult<impl IntoResponse> {
    load_managed_listing(&state, &auth, listing_id).await?;

    let listing = ListingRepo::adjust_available_rooms(&state.pool, listing_id, input.delta).await?;

    tracing::info!(
        listing_id,
        delta = input.delta,
        available_rooms = listing.available_rooms,
        "Available rooms adjusted"
    );
    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/listings/{id}/bookings
pub async fn listing_bookings(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_managed_listing(&state, &auth, listing_id).await?;
    let bookings = BookingRepo::list_by_listing(&state.pool, listing_id).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/listings/{id}/inquiries
pub async fn listing_inquiries(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_managed_listing(&state, &auth, listing_id).await?;
    let inquiries = InquiryRepo::list_by_listing(&state.pool, listing_id).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amenities_parse_from_comma_list() {
        let params = ListingSearchParams {
            amenities: Some("wifi, ac,,".into()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert_eq!(filter.amenities, vec![Amenity::Wifi, Amenity::Ac]);
    }

    #[test]
    fn unknown_amenity_is_a_validation_error() {
        let params = ListingSearchParams {
            amenities: Some("wifi,jacuzzi".into()),
            ..Default::default()
        };
        let err = params.into_filter().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }
}

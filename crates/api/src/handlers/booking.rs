//! Handlers for the `/bookings` resource.
//!
//! Creating a booking takes a room from the listing in the same transaction.
//! Cancelling or completing one gives it back.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::booking::{authorize_transition, BookingParty, BookingStatus};
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::booking::{Booking, CreateBooking, UpdateBookingDates};
use gharpayy_db::repositories::BookingRepo;
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /bookings/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: BookingStatus,
}

/// Load a booking together with the caller's relation to it.
async fn load_booking(
    state: &AppState,
    auth: &AuthUser,
    booking_id: DbId,
) -> AppResult<(Booking, BookingParty)> {
    let booking = BookingRepo::find_by_id(&state.pool, booking_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Booking",
            id: booking_id,
        }))?;

    let party = BookingParty::resolve(
        auth.role,
        booking.tenant_id == auth.user_id,
        booking.owner_id == auth.user_id,
    );
    if !party.can_view() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a party to this booking".into(),
        )));
    }
    Ok((booking, party))
}

/// POST /api/v1/bookings
///
/// Book a room. The booking starts `pending`.
pub async fn create_booking(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    let booking = BookingRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        booking_id = booking.id,
        listing_id = booking.listing_id,
        tenant_id = auth.user_id,
        "Booking created"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::BOOKING_CREATED)
            .with_source("booking", booking.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "listing_id": booking.listing_id,
                "owner_id": booking.owner_id,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

/// GET /api/v1/bookings
///
/// Tenants see their bookings, owners the bookings on their listings.
/// Admins list bookings per listing instead.
pub async fn my_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bookings = match auth.role {
        Role::Tenant => BookingRepo::list_by_tenant(&state.pool, auth.user_id).await?,
        Role::Owner => BookingRepo::list_by_owner(&state.pool, auth.user_id).await?,
        Role::Admin => {
            return Err(AppError::BadRequest(
                "Admins list bookings through /listings/{id}/bookings".into(),
            ))
        }
    };
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (booking, _) = load_booking(&state, &auth, booking_id).await?;
    Ok(Json(DataResponse { data: booking }))
}

/// PUT /api/v1/bookings/{id}
///
/// Reschedule. Only the booking tenant or an admin, and only while the
/// booking is not finished.
pub async fn update_booking_dates(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<UpdateBookingDates>,
) -> AppResult<impl IntoResponse> {
    let (_, party) = load_booking(&state, &auth, booking_id).await?;
    match party {
        BookingParty::Tenant | BookingParty::Admin => {}
        BookingParty::Owner | BookingParty::Unrelated => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Only the tenant can reschedule a booking".into(),
            )))
        }
    }

    let booking = BookingRepo::update_dates(&state.pool, booking_id, &input).await?;

    tracing::info!(booking_id, user_id = auth.user_id, "Booking rescheduled");
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{id}/status
///
/// Move a booking through its lifecycle. Tenants may only cancel.
pub async fn transition_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let (current, party) = load_booking(&state, &auth, booking_id).await?;
    authorize_transition(party, input.status)?;

    let booking = BookingRepo::transition(&state.pool, booking_id, input.status).await?;

    tracing::info!(
        booking_id,
        from = %current.status,
        to = %booking.status,
        user_id = auth.user_id,
        "Booking status changed"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::BOOKING_STATUS_CHANGED)
            .with_source("booking", booking.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "listing_id": booking.listing_id,
                "from": current.status,
                "to": booking.status,
            })),
    );

    Ok(Json(DataResponse { data: booking }))
}

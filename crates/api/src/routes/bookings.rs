//! Route definitions for `/bookings`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET  /              -> my_bookings
/// POST /              -> create_booking
/// GET  /{id}          -> get_booking
/// PUT  /{id}          -> update_booking_dates
/// POST /{id}/status   -> transition_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(booking::my_bookings).post(booking::create_booking),
        )
        .route(
            "/{id}",
            get(booking::get_booking).put(booking::update_booking_dates),
        )
        .route("/{id}/status", post(booking::transition_booking))
}

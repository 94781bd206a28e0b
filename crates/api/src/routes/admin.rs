//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /users                        -> list_users
/// POST /users                        -> create_user
/// POST /owners/{id}/verify-license   -> verify_owner_license
/// GET  /listings/pending             -> pending_listings
/// POST /listings/{id}/approve        -> approve_listing
/// POST /listings/{id}/reject         -> reject_listing
/// GET  /events                       -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/owners/{id}/verify-license",
            post(admin::verify_owner_license),
        )
        .route("/listings/pending", get(admin::pending_listings))
        .route("/listings/{id}/approve", post(admin::approve_listing))
        .route("/listings/{id}/reject", post(admin::reject_listing))
        .route("/events", get(admin::list_events))
}

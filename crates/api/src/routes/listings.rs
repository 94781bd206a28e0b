//! Route definitions for `/listings`, including per-listing reviews.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{listing, review};
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                  -> search_listings
/// POST   /                  -> create_listing
/// GET    /mine              -> my_listings
/// GET    /{id}              -> get_listing
/// PUT    /{id}              -> update_listing
/// DELETE /{id}              -> delete_listing
/// POST   /{id}/rooms        -> adjust_rooms
/// GET    /{id}/bookings     -> listing_bookings
/// GET    /{id}/inquiries    -> listing_inquiries
/// GET    /{id}/reviews      -> list_reviews
/// POST   /{id}/reviews      -> add_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listing::search_listings).post(listing::create_listing),
        )
        .route("/mine", get(listing::my_listings))
        .route(
            "/{id}",
            get(listing::get_listing)
                .put(listing::update_listing)
                .delete(listing::delete_listing),
        )
        .route("/{id}/rooms", post(listing::adjust_rooms))
        .route("/{id}/bookings", get(listing::listing_bookings))
        .route("/{id}/inquiries", get(listing::listing_inquiries))
        .route(
            "/{id}/reviews",
            get(review::list_reviews).post(review::add_review),
        )
}

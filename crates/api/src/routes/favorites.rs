//! Route definitions for `/favorites`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::favorite;
use crate::state::AppState;

/// Routes mounted at `/favorites`.
///
/// ```text
/// GET    /                -> list_favorites
/// GET    /ids             -> list_favorite_ids
/// PUT    /{listing_id}    -> add_favorite
/// DELETE /{listing_id}    -> remove_favorite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(favorite::list_favorites))
        .route("/ids", get(favorite::list_favorite_ids))
        .route(
            "/{listing_id}",
            put(favorite::add_favorite).delete(favorite::remove_favorite),
        )
}

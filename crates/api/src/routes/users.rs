//! Route definitions for `/users`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// PUT /me              -> update_me
/// GET /me/tenant       -> get_tenant_profile
/// PUT /me/preferences  -> update_preferences
/// GET /me/owner        -> get_owner_profile
/// PUT /me/business     -> update_business
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", put(user::update_me))
        .route("/me/tenant", get(user::get_tenant_profile))
        .route("/me/preferences", put(user::update_preferences))
        .route("/me/owner", get(user::get_owner_profile))
        .route("/me/business", put(user::update_business))
}

//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup                  -> sign_up
/// POST /signin                  -> sign_in
/// POST /refresh                 -> refresh
/// POST /signout                 -> sign_out (requires auth)
/// GET  /me                      -> me (requires auth)
/// POST /reset-password          -> request_password_reset
/// POST /reset-password/confirm  -> confirm_password_reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/signin", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .route("/signout", post(auth::sign_out))
        .route("/me", get(auth::me))
        .route("/reset-password", post(auth::request_password_reset))
        .route("/reset-password/confirm", post(auth::confirm_password_reset))
}

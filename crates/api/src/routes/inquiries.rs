//! Route definitions for `/inquiries`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inquiry;
use crate::state::AppState;

/// Routes mounted at `/inquiries`.
///
/// ```text
/// GET  /               -> my_inquiries
/// POST /               -> create_inquiry
/// POST /{id}/respond   -> respond_to_inquiry
/// POST /{id}/read      -> mark_inquiry_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inquiry::my_inquiries).post(inquiry::create_inquiry),
        )
        .route("/{id}/respond", post(inquiry::respond_to_inquiry))
        .route("/{id}/read", post(inquiry::mark_inquiry_read))
}

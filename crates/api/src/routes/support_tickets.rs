//! Route definitions for `/support-tickets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::support_ticket;
use crate::state::AppState;

/// Routes mounted at `/support-tickets`.
///
/// ```text
/// GET  /              -> list_tickets
/// POST /              -> create_ticket
/// GET  /{id}          -> get_ticket
/// PUT  /{id}          -> update_ticket
/// POST /{id}/status   -> transition_ticket (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(support_ticket::list_tickets).post(support_ticket::create_ticket),
        )
        .route(
            "/{id}",
            get(support_ticket::get_ticket).put(support_ticket::update_ticket),
        )
        .route("/{id}/status", post(support_ticket::transition_ticket))
}

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod favorites;
pub mod health;
pub mod inquiries;
pub mod listings;
pub mod support_tickets;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                          sign up as tenant or owner (public)
/// /auth/signin                          sign in (public)
/// /auth/refresh                         rotate refresh token (public)
/// /auth/signout                         end all sessions
/// /auth/me                              current user
/// /auth/reset-password                  request reset (public, always 202)
/// /auth/reset-password/confirm          set new password (public)
///
/// /users/me                             update profile (PUT)
/// /users/me/tenant                      tenant profile (GET)
/// /users/me/preferences                 tenant search preferences (PUT)
/// /users/me/owner                       owner profile (GET)
/// /users/me/business                    owner business details (PUT)
///
/// /listings                             search (GET), publish (POST, owner)
/// /listings/mine                        caller's listings (owner)
/// /listings/{id}                        get, update, delete
/// /listings/{id}/rooms                  adjust available rooms (POST)
/// /listings/{id}/bookings               bookings on the listing (owner/admin)
/// /listings/{id}/inquiries              inquiries about the listing (owner/admin)
/// /listings/{id}/reviews                list (GET), add (POST, tenant)
///
/// /bookings                             caller's bookings (GET), book (POST, tenant)
/// /bookings/{id}                        get, reschedule (PUT)
/// /bookings/{id}/status                 lifecycle transition (POST)
///
/// /inquiries                            caller's inquiries (GET), send (POST, tenant)
/// /inquiries/{id}/respond               one-shot response (POST, owner)
/// /inquiries/{id}/read                  mark read (POST, owner)
///
/// /favorites                            favorite listings (GET, tenant)
/// /favorites/ids                        favorite listing ids (GET)
/// /favorites/{listing_id}               add (PUT), remove (DELETE)
///
/// /support-tickets                      list (GET), open (POST)
/// /support-tickets/{id}                 get, update (PUT)
/// /support-tickets/{id}/status          forward transition (POST, admin)
///
/// /admin/users                          list, create (admin only)
/// /admin/owners/{id}/verify-license     verify owner license
/// /admin/listings/pending               approval queue
/// /admin/listings/{id}/approve          approve
/// /admin/listings/{id}/reject           reject and deactivate
/// /admin/events                         persisted domain events
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/listings", listings::router())
        .nest("/bookings", bookings::router())
        .nest("/inquiries", inquiries::router())
        .nest("/favorites", favorites::router())
        .nest("/support-tickets", support_tickets::router())
        .nest("/admin", admin::router())
}

//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! qualify. Roles are matched exhaustively so a new role cannot slip through.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Admin => Ok(RequireAdmin(user)),
            Role::Tenant | Role::Owner => Err(forbidden("Admin role required")),
        }
    }
}

/// Requires `owner` or `admin`. Ownership of the specific resource is
/// checked by the handler.
pub struct RequireOwner(pub AuthUser);

impl FromRequestParts<AppState> for RequireOwner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Owner | Role::Admin => Ok(RequireOwner(user)),
            Role::Tenant => Err(forbidden("Owner or Admin role required")),
        }
    }
}

/// Requires the `tenant` role. Tenant-only actions (booking, favorites,
/// reviews) need a tenant profile, which admins do not have.
pub struct RequireTenant(pub AuthUser);

impl FromRequestParts<AppState> for RequireTenant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Tenant => Ok(RequireTenant(user)),
            Role::Owner | Role::Admin => Err(forbidden("Tenant role required")),
        }
    }
}

/// Requires any authenticated user.
///
/// Functionally equivalent to [`AuthUser`] but self-documenting in route
/// handlers.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

fn forbidden(msg: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(msg.into()))
}

//! Handlers for the `/auth` resource.
//!
//! Thin wrappers over [`IdentityGateway`](crate::auth::gateway::IdentityGateway).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::gateway::{AuthResponse, NewAccount};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup` and `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    /// Strength is checked against the configured minimum length.
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 10, max = 16))]
    pub phone_number: Option<String>,
    pub role: Role,
}

impl From<SignUpRequest> for NewAccount {
    fn from(req: SignUpRequest) -> Self {
        NewAccount {
            email: req.email,
            password: req.password,
            name: req.name,
            phone_number: req.phone_number,
            role: req.role,
        }
    }
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Request body for `POST /auth/reset-password/confirm`.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmResetRequest {
    #[validate(length(min = 1))]
    pub token: String,
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create a tenant or owner account with its profile. Returns 201.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let user = state.identity.sign_up(input.into()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/signin
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.identity.sign_in(&input.email, &input.password).await?;
    tracing::info!(user_id = response.user.id, "User signed in");
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new token pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.identity.refresh(&input.refresh_token).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/signout
///
/// End every session of the caller. Always 204.
pub async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> StatusCode {
    state.identity.sign_out(auth.user_id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/auth/reset-password
///
/// Always 202, whether or not the email is known.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;
    state.identity.request_password_reset(&input.email).await;
    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/reset-password/confirm
///
/// Set a new password from a reset token. Existing sessions end.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(input): Json<ConfirmResetRequest>,
) -> AppResult<StatusCode> {
    input.validate()?;
    state
        .identity
        .confirm_password_reset(&input.token, &input.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/inquiries` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::inquiry::{CreateInquiry, Inquiry};
use gharpayy_db::repositories::InquiryRepo;
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireOwner, RequireTenant};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /inquiries`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInquiryRequest {
    pub listing_id: DbId,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

/// Body for `POST /inquiries/{id}/respond`.
#[derive(Debug, Deserialize, Validate)]
pub struct RespondRequest {
    #[validate(length(min = 1, max = 5000))]
    pub response: String,
}

/// The inquiry, if the caller owns the listing it was sent about (or is admin).
async fn load_received_inquiry(
    state: &AppState,
    auth: &AuthUser,
    inquiry_id: DbId,
) -> AppResult<Inquiry> {
    let inquiry = InquiryRepo::find_by_id(&state.pool, inquiry_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Inquiry",
            id: inquiry_id,
        }))?;
    if !auth.is_admin() && inquiry.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "This inquiry was not sent to you".into(),
        )));
    }
    Ok(inquiry)
}

/// POST /api/v1/inquiries
pub async fn create_inquiry(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Json(input): Json<CreateInquiryRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let create = CreateInquiry {
        listing_id: input.listing_id,
        message: input.message.trim().to_string(),
    };
    let inquiry = InquiryRepo::create(&state.pool, auth.user_id, &create).await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        listing_id = inquiry.listing_id,
        tenant_id = auth.user_id,
        "Inquiry created"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::INQUIRY_CREATED)
            .with_source("inquiry", inquiry.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "listing_id": inquiry.listing_id,
                "owner_id": inquiry.owner_id,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}

/// GET /api/v1/inquiries
///
/// Sent inquiries for tenants, received ones for owners.
pub async fn my_inquiries(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let inquiries = match auth.role {
        Role::Tenant => InquiryRepo::list_by_tenant(&state.pool, auth.user_id).await?,
        Role::Owner => InquiryRepo::list_by_owner(&state.pool, auth.user_id).await?,
        Role::Admin => {
            return Err(AppError::BadRequest(
                "Admins list inquiries through /listings/{id}/inquiries".into(),
            ))
        }
    };
    Ok(Json(DataResponse { data: inquiries }))
}

/// POST /api/v1/inquiries/{id}/respond
///
/// One response per inquiry; a second one is a conflict.
pub async fn respond_to_inquiry(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(inquiry_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_received_inquiry(&state, &auth, inquiry_id).await?;

    let inquiry = InquiryRepo::respond(&state.pool, inquiry_id, input.response.trim()).await?;

    tracing::info!(inquiry_id, owner_id = auth.user_id, "Inquiry answered");
    state.event_bus.publish(
        PlatformEvent::new(event_types::INQUIRY_RESPONDED)
            .with_source("inquiry", inquiry.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "tenant_id": inquiry.tenant_id })),
    );

    Ok(Json(DataResponse { data: inquiry }))
}

/// POST /api/v1/inquiries/{id}/read
pub async fn mark_inquiry_read(
    RequireOwner(auth): RequireOwner,
    State(state): State<AppState>,
    Path(inquiry_id): Path<DbId>,
) -> AppResult<StatusCode> {
    load_received_inquiry(&state, &auth, inquiry_id).await?;
    InquiryRepo::mark_read(&state.pool, inquiry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/support-tickets` resource.
//!
//! Anyone signed in can open a ticket and edit their own. Status moves
//! forward only and is driven by admins.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::ticket::TicketStatus;
use gharpayy_core::types::DbId;
use gharpayy_db::models::support_ticket::{CreateSupportTicket, SupportTicket, UpdateSupportTicket};
use gharpayy_db::repositories::SupportTicketRepo;
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /support-tickets`. Only admins may filter.
#[derive(Debug, Deserialize)]
pub struct TicketListParams {
    pub status: Option<TicketStatus>,
}

/// Body for `POST /support-tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct TicketTransitionRequest {
    pub status: TicketStatus,
}

async fn load_own_ticket(
    state: &AppState,
    auth: &AuthUser,
    ticket_id: DbId,
) -> AppResult<SupportTicket> {
    let ticket = SupportTicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id: ticket_id,
        }))?;
    if !auth.is_admin() && ticket.creator_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You did not open this ticket".into(),
        )));
    }
    Ok(ticket)
}

/// POST /api/v1/support-tickets
pub async fn create_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSupportTicket>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let ticket = SupportTicketRepo::create(&state.pool, auth.user_id, &input).await?;

    tracing::info!(
        ticket_id = ticket.id,
        category = %ticket.category,
        priority = %ticket.priority,
        creator_id = auth.user_id,
        "Support ticket opened"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::TICKET_CREATED)
            .with_source("support_ticket", ticket.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "category": ticket.category,
                "priority": ticket.priority,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/support-tickets
///
/// Admins see every ticket, optionally by status; everyone else their own.
pub async fn list_tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<impl IntoResponse> {
    let tickets = match auth.role {
        Role::Admin => SupportTicketRepo::list(&state.pool, params.status).await?,
        Role::Tenant | Role::Owner => {
            SupportTicketRepo::list_by_creator(&state.pool, auth.user_id).await?
        }
    };
    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/support-tickets/{id}
pub async fn get_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = load_own_ticket(&state, &auth, ticket_id).await?;
    Ok(Json(DataResponse { data: ticket }))
}

/// PUT /api/v1/support-tickets/{id}
///
/// Edit title, description, category or priority.
pub async fn update_ticket(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<UpdateSupportTicket>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_own_ticket(&state, &auth, ticket_id).await?;

    let ticket = SupportTicketRepo::update(&state.pool, ticket_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id: ticket_id,
        }))?;

    tracing::info!(ticket_id, user_id = auth.user_id, "Support ticket updated");
    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/support-tickets/{id}/status
///
/// `open -> in_progress -> resolved`. Nothing changes after `resolved`.
pub async fn transition_ticket(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
    Json(input): Json<TicketTransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let ticket = SupportTicketRepo::transition(&state.pool, ticket_id, input.status).await?;

    tracing::info!(ticket_id, status = %ticket.status, admin_id = admin.user_id, "Support ticket status changed");
    state.event_bus.publish(
        PlatformEvent::new(event_types::TICKET_STATUS_CHANGED)
            .with_source("support_ticket", ticket.id)
            .with_actor(admin.user_id)
            .with_payload(serde_json::json!({ "status": ticket.status })),
    );

    Ok(Json(DataResponse { data: ticket }))
}

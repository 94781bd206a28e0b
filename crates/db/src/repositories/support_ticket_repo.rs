//! Repository for the `support_tickets` table.

use gharpayy_core::error::CoreError;
use gharpayy_core::ticket::TicketStatus;
use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::support_ticket::{CreateSupportTicket, SupportTicket, UpdateSupportTicket};
use crate::DbError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, description, category, priority, status, creator_id, created_at, updated_at";

/// Provides CRUD and status operations for support tickets.
pub struct SupportTicketRepo;

impl SupportTicketRepo {
    /// Open a new ticket. Status always starts at `open`.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateSupportTicket,
    ) -> Result<SupportTicket, sqlx::Error> {
        let query = format!(
            "INSERT INTO support_tickets (title, description, category, priority, status, creator_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.as_str())
            .bind(input.priority.as_str())
            .bind(TicketStatus::Open.as_str())
            .bind(creator_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM support_tickets WHERE id = $1");
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a ticket. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSupportTicket,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let query = format!(
            "UPDATE support_tickets SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.priority.map(|p| p.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Advance the ticket's status. Only forward moves are accepted and a
    /// resolved ticket no longer changes.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        to: TicketStatus,
    ) -> Result<SupportTicket, DbError> {
        let mut tx = pool.begin().await?;

        let current: Option<String> =
            sqlx::query_scalar("SELECT status FROM support_tickets WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or(CoreError::NotFound {
            entity: "SupportTicket",
            id,
        })?;
        current.parse::<TicketStatus>().map_err(CoreError::from)?.transition(to)?;

        let query = format!(
            "UPDATE support_tickets SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .bind(to.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ticket)
    }

    /// All tickets, newest first, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<TicketStatus>,
    ) -> Result<Vec<SupportTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM support_tickets
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
    ) -> Result<Vec<SupportTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM support_tickets WHERE creator_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }
}

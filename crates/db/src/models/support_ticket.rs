//! Support ticket entity model and DTOs.

use gharpayy_core::error::CoreError;
use gharpayy_core::ticket::{SupportCategory, SupportPriority, TicketStatus};
use gharpayy_core::types::{DbId, Timestamp};
use gharpayy_core::validation::{validate_text, MAX_LONG_TEXT, MAX_SHORT_TEXT};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A ticket row from the `support_tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupportTicket {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub category: SupportCategory,
    #[sqlx(try_from = "String")]
    pub priority: SupportPriority,
    #[sqlx(try_from = "String")]
    pub status: TicketStatus,
    pub creator_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a ticket. Status always starts at `open`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupportTicket {
    pub title: String,
    pub description: String,
    pub category: SupportCategory,
    pub priority: SupportPriority,
}

impl CreateSupportTicket {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_text("title", &self.title, MAX_SHORT_TEXT)?;
        validate_text("description", &self.description, MAX_LONG_TEXT)
    }
}

/// DTO for editing a ticket. All fields are optional; status moves through
/// the transition endpoint only.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSupportTicket {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<SupportCategory>,
    pub priority: Option<SupportPriority>,
}

impl UpdateSupportTicket {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(title) = &self.title {
            validate_text("title", title, MAX_SHORT_TEXT)?;
        }
        if let Some(description) = &self.description {
            validate_text("description", description, MAX_LONG_TEXT)?;
        }
        Ok(())
    }
}

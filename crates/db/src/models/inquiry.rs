//! Inquiry entity model and DTOs.

use gharpayy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An inquiry row from the `inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Inquiry {
    pub id: DbId,
    pub tenant_id: DbId,
    pub listing_id: DbId,
    pub owner_id: DbId,
    pub message: String,
    pub is_read: bool,
    pub response: Option<String>,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// DTO for asking an owner about a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquiry {
    pub listing_id: DbId,
    pub message: String,
}

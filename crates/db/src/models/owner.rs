//! Owner profile model and DTOs.

use gharpayy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `owners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Owner {
    pub user_id: DbId,
    pub business_name: Option<String>,
    pub license_number: Option<String>,
    /// Set only by an admin.
    pub is_license_verified: bool,
    pub listing_ids: Vec<DbId>,
    pub total_bookings: i32,
    /// Mean rating of the owner's reviewed listings.
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the owner's business details.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOwnerBusiness {
    pub business_name: Option<String>,
    pub license_number: Option<String>,
}

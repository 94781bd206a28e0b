//! Review entity model and DTOs.

use gharpayy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A review row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub tenant_id: DbId,
    pub listing_id: DbId,
    pub rating: i16,
    pub comment: String,
    pub created_at: Timestamp,
}

/// DTO for reviewing a listing. The listing comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReview {
    pub rating: i16,
    pub comment: String,
}

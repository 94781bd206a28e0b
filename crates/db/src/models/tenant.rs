//! Tenant profile model.

use gharpayy_core::listing::{AmenitySet, RoomType};
use gharpayy_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

/// Search preferences a tenant saves on their profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantPreferences {
    pub max_rent: Option<f64>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub required_amenities: AmenitySet,
    pub room_type: Option<RoomType>,
}

/// A row from the `tenants` table.
#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub user_id: DbId,
    pub preferences: TenantPreferences,
    pub favorite_listing_ids: Vec<DbId>,
    pub booking_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn decode_error(column: &str, err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}

impl<'r> FromRow<'r, PgRow> for Tenant {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let required_amenities: Vec<String> = row.try_get("required_amenities")?;
        let room_type: Option<String> = row.try_get("preferred_room_type")?;

        Ok(Self {
            user_id: row.try_get("user_id")?,
            preferences: TenantPreferences {
                max_rent: row.try_get("max_rent")?,
                preferred_locations: row.try_get("preferred_locations")?,
                required_amenities: AmenitySet::try_from(required_amenities)
                    .map_err(|e| decode_error("required_amenities", e))?,
                room_type: room_type
                    .map(|v| v.parse::<RoomType>())
                    .transpose()
                    .map_err(|e| decode_error("preferred_room_type", e))?,
            },
            favorite_listing_ids: row.try_get("favorite_listing_ids")?,
            booking_ids: row.try_get("booking_ids")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

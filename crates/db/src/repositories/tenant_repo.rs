//! Repository for the `tenants` table.

use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::{Tenant, TenantPreferences};

const COLUMNS: &str = "user_id, max_rent, preferred_locations, required_amenities, \
                       preferred_room_type, favorite_listing_ids, booking_ids, \
                       created_at, updated_at";

/// Tenant profiles.
pub struct TenantRepo;

impl TenantRepo {
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE user_id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the saved search preferences.
    pub async fn update_preferences(
        pool: &PgPool,
        user_id: DbId,
        prefs: &TenantPreferences,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!(
            "UPDATE tenants SET
                max_rent = $2,
                preferred_locations = $3,
                required_amenities = $4,
                preferred_room_type = $5
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(user_id)
            .bind(prefs.max_rent)
            .bind(&prefs.preferred_locations)
            .bind(prefs.required_amenities.to_strings())
            .bind(prefs.room_type.map(|r| r.as_str()))
            .fetch_optional(pool)
            .await
    }
}

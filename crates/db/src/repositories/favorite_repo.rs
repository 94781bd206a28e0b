//! Favorites live on the tenant profile as a set of listing ids.

use gharpayy_core::error::CoreError;
use gharpayy_core::listing::is_visible_to_tenants;
use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::Listing;
use crate::repositories::ListingRepo;
use crate::DbError;

/// Set-membership updates on `tenants.favorite_listing_ids`.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Add a listing to the tenant's favorites. Adding twice is a no-op.
    ///
    /// Only listings visible to tenants can be added. Returns the favorite
    /// ids after the update.
    pub async fn add(pool: &PgPool, tenant_id: DbId, listing_id: DbId) -> Result<Vec<DbId>, DbError> {
        let listing = ListingRepo::find_by_id(pool, listing_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            })?;
        if !is_visible_to_tenants(listing.is_approved, listing.is_active) {
            return Err(
                CoreError::Conflict(format!("Listing {listing_id} cannot be favorited")).into(),
            );
        }

        let ids: Option<Vec<DbId>> = sqlx::query_scalar(
            "UPDATE tenants SET favorite_listing_ids = CASE
                WHEN $2 = ANY(favorite_listing_ids) THEN favorite_listing_ids
                ELSE array_append(favorite_listing_ids, $2)
             END
             WHERE user_id = $1
             RETURNING favorite_listing_ids",
        )
        .bind(tenant_id)
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;
        Ok(ids.ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?)
    }

    /// Remove a listing from the tenant's favorites. Removing an absent id is a no-op.
    pub async fn remove(
        pool: &PgPool,
        tenant_id: DbId,
        listing_id: DbId,
    ) -> Result<Vec<DbId>, DbError> {
        let ids: Option<Vec<DbId>> = sqlx::query_scalar(
            "UPDATE tenants SET favorite_listing_ids = array_remove(favorite_listing_ids, $2)
             WHERE user_id = $1
             RETURNING favorite_listing_ids",
        )
        .bind(tenant_id)
        .bind(listing_id)
        .fetch_optional(pool)
        .await?;
        Ok(ids.ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?)
    }

    pub async fn list_ids(pool: &PgPool, tenant_id: DbId) -> Result<Vec<DbId>, DbError> {
        let ids: Option<Vec<DbId>> =
            sqlx::query_scalar("SELECT favorite_listing_ids FROM tenants WHERE user_id = $1")
                .bind(tenant_id)
                .fetch_optional(pool)
                .await?;
        Ok(ids.ok_or(CoreError::NotFound {
            entity: "Tenant",
            id: tenant_id,
        })?)
    }

    /// The tenant's favorite listings, in favorite order.
    ///
    /// Each id is a point read; listings deleted since they were favorited
    /// are skipped.
    pub async fn list(pool: &PgPool, tenant_id: DbId) -> Result<Vec<Listing>, DbError> {
        let ids = Self::list_ids(pool, tenant_id).await?;
        let found = futures::future::try_join_all(
            ids.iter().map(|id| ListingRepo::find_by_id(pool, *id)),
        )
        .await?;
        Ok(found.into_iter().flatten().collect())
    }
}

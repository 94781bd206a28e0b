//! Repository for the `reviews` table.

use gharpayy_core::error::CoreError;
use gharpayy_core::listing::is_visible_to_tenants;
use gharpayy_core::rating::validate_rating;
use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::listing::Listing;
use crate::models::review::{CreateReview, Review};
use crate::repositories::{ListingRepo, OwnerRepo};
use crate::DbError;

const COLUMNS: &str = "id, tenant_id, listing_id, rating, comment, created_at";

/// Append-only listing reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Append a review and recompute the listing's `rating` and `review_count`.
    ///
    /// The listing row is locked while the aggregate is recomputed from all of
    /// its reviews, then the owner's rating is refreshed. Returns the review
    /// and the updated listing. Listings hidden from tenants take no reviews
    /// ([`CoreError::Conflict`]).
    pub async fn add(
        pool: &PgPool,
        tenant_id: DbId,
        listing_id: DbId,
        input: &CreateReview,
    ) -> Result<(Review, Listing), DbError> {
        validate_rating(input.rating)?;

        let mut tx = pool.begin().await?;

        let listing = ListingRepo::lock(&mut tx, listing_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Listing",
                id: listing_id,
            })?;
        if !is_visible_to_tenants(listing.is_approved, listing.is_active) {
            return Err(
                CoreError::Conflict(format!("Listing {} is not open for reviews", listing.id)).into(),
            );
        }

        let query = format!(
            "INSERT INTO reviews (tenant_id, listing_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let review = sqlx::query_as::<_, Review>(&query)
            .bind(tenant_id)
            .bind(listing_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(&mut *tx)
            .await?;

        let listing = ListingRepo::refresh_rating(&mut tx, listing.id).await?;
        OwnerRepo::recompute_rating(&mut tx, listing.owner_id).await?;

        tx.commit().await?;
        Ok((review, listing))
    }

    pub async fn list_by_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE listing_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }
}

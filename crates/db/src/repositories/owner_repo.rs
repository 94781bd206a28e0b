//! Repository for the `owners` table.

use gharpayy_core::error::CoreError;
use gharpayy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::owner::{Owner, UpdateOwnerBusiness};
use crate::DbError;

const COLUMNS: &str = "user_id, business_name, license_number, is_license_verified, \
                       listing_ids, total_bookings, rating, created_at, updated_at";

/// Owner profiles and their aggregates.
pub struct OwnerRepo;

impl OwnerRepo {
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Owner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM owners WHERE user_id = $1");
        sqlx::query_as::<_, Owner>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_business(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateOwnerBusiness,
    ) -> Result<Option<Owner>, sqlx::Error> {
        let query = format!(
            "UPDATE owners SET business_name = $2, license_number = $3
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Owner>(&query)
            .bind(user_id)
            .bind(&input.business_name)
            .bind(&input.license_number)
            .fetch_optional(pool)
            .await
    }

    /// Mark the owner's license as verified and the user as verified, atomically.
    pub async fn verify_license(pool: &PgPool, user_id: DbId) -> Result<Owner, DbError> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE owners SET is_license_verified = true
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        );
        let owner = sqlx::query_as::<_, Owner>(&query)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Owner",
                id: user_id,
            })?;

        sqlx::query("UPDATE users SET is_verified = true WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(owner)
    }

    /// Recompute the owner's rating as the mean of their reviewed listings' ratings.
    ///
    /// Runs on the caller's connection so it can share a transaction.
    pub async fn recompute_rating(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE owners SET rating = COALESCE(
                (SELECT AVG(rating) FROM listings WHERE owner_id = $1 AND review_count > 0),
                0)
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(conn)
        .await?;
        Ok(())
    }
}

//! Repository for the `listings` table.
//!
//! `available_rooms` is only ever written inside a transaction that holds the
//! listing's row lock (`SELECT ... FOR UPDATE`), so two concurrent bookings on
//! the same listing serialize on that lock instead of racing.

use gharpayy_core::error::CoreError;
use gharpayy_core::inventory::{apply_room_delta, rebase_available_rooms};
use gharpayy_core::listing::ListingFilter;
use gharpayy_core::rating::RatingSummary;
use gharpayy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::listing::{CreateListing, Listing, UpdateListing};
use crate::retry::with_retry;
use crate::DbError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, street, city, state, pincode, \
                       latitude, longitude, rent, security_deposit, room_type, total_rooms, \
                       available_rooms, amenities, rules, images, is_approved, is_active, \
                       rating, review_count, created_at, updated_at";

/// Provides CRUD, search and inventory operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new, unapproved listing and record it on the owner profile.
    ///
    /// If `available_rooms` is `None` in the input, defaults to `total_rooms`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateListing,
    ) -> Result<Listing, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO listings (owner_id, title, description, street, city, state, pincode, \
                                   latitude, longitude, rent, security_deposit, room_type, \
                                   total_rooms, available_rooms, amenities, rules, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                     COALESCE($14, $13), $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.address.street)
            .bind(&input.address.city)
            .bind(&input.address.state)
            .bind(&input.address.pincode)
            .bind(input.address.latitude)
            .bind(input.address.longitude)
            .bind(input.rent)
            .bind(input.security_deposit)
            .bind(input.room_type.as_str())
            .bind(input.total_rooms)
            .bind(input.available_rooms)
            .bind(input.amenities.to_strings())
            .bind(&input.rules)
            .bind(&input.images)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE owners SET listing_ids = array_append(listing_ids, $2) WHERE user_id = $1",
        )
        .bind(owner_id)
        .bind(listing.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(listing)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a listing's editable fields.
    ///
    /// `available_rooms` is rebased onto the new `total_rooms` so the number
    /// of booked rooms is unchanged. Returns `None` if the listing does not
    /// exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, DbError> {
        let mut tx = pool.begin().await?;

        let Some(current) = Self::lock(&mut tx, id).await? else {
            return Ok(None);
        };
        let available = rebase_available_rooms(
            current.total_rooms,
            current.available_rooms,
            input.total_rooms,
        )?;

        let query = format!(
            "UPDATE listings SET
                title = $2, description = $3, street = $4, city = $5, state = $6,
                pincode = $7, latitude = $8, longitude = $9, rent = $10,
                security_deposit = $11, room_type = $12, total_rooms = $13,
                available_rooms = $14, amenities = $15, rules = $16, images = $17,
                is_active = $18
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.address.street)
            .bind(&input.address.city)
            .bind(&input.address.state)
            .bind(&input.address.pincode)
            .bind(input.address.latitude)
            .bind(input.address.longitude)
            .bind(input.rent)
            .bind(input.security_deposit)
            .bind(input.room_type.as_str())
            .bind(input.total_rooms)
            .bind(available)
            .bind(input.amenities.to_strings())
            .bind(&input.rules)
            .bind(&input.images)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(listing))
    }

    /// Delete a listing and drop it from the owner profile.
    ///
    /// Fails with a foreign-key violation while bookings still reference it.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let owner_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM listings WHERE id = $1 RETURNING owner_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(owner_id) = owner_id else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE owners SET listing_ids = array_remove(listing_ids, $2) WHERE user_id = $1",
        )
        .bind(owner_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Tenant-facing search: approved and active listings only, newest first.
    ///
    /// Rent, room type and city are SQL predicates. Amenities and free text
    /// are matched after the fetch.
    pub async fn list_visible(
        pool: &PgPool,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE is_approved = true AND is_active = true
               AND ($1::DOUBLE PRECISION IS NULL OR rent <= $1)
               AND ($2::TEXT IS NULL OR room_type = $2)
               AND ($3::TEXT IS NULL OR LOWER(city) = LOWER($3))
             ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, Listing>(&query)
            .bind(filter.max_rent)
            .bind(filter.room_type.map(|r| r.as_str()))
            .bind(filter.city_predicate())
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().filter(|l| l.matches(filter)).collect())
    }

    /// All listings of one owner regardless of approval, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Listings waiting for an admin decision, oldest first.
    pub async fn list_pending(pool: &PgPool) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE is_approved = false AND is_active = true
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Listing>(&query).fetch_all(pool).await
    }

    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET is_approved = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Reject a listing. This also deactivates it.
    pub async fn reject(pool: &PgPool, id: DbId) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET is_approved = false, is_active = false
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Add `delta` to `available_rooms` in its own transaction.
    ///
    /// Fails with [`CoreError::InvariantViolation`] when the result would leave
    /// `0..=total_rooms`; nothing is written in that case.
    pub async fn adjust_available_rooms(
        pool: &PgPool,
        id: DbId,
        delta: i32,
    ) -> Result<Listing, DbError> {
        with_retry("adjust_available_rooms", || async move {
            let mut tx = pool.begin().await?;
            let listing = Self::adjust_in_tx(&mut tx, id, delta).await?;
            tx.commit().await?;
            Ok::<_, DbError>(listing)
        })
        .await
    }

    /// Recompute `rating` and `review_count` from every review of the listing.
    pub(crate) async fn refresh_rating(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Listing, sqlx::Error> {
        let ratings: Vec<i16> = sqlx::query_scalar("SELECT rating FROM reviews WHERE listing_id = $1")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
        let summary = RatingSummary::from_ratings(&ratings);

        let query = format!(
            "UPDATE listings SET rating = $2, review_count = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(summary.rating)
            .bind(summary.review_count)
            .fetch_one(conn)
            .await
    }

    /// Lock the listing row for the rest of the caller's transaction.
    pub(crate) async fn lock(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Room adjustment on the caller's transaction.
    pub(crate) async fn adjust_in_tx(
        conn: &mut PgConnection,
        id: DbId,
        delta: i32,
    ) -> Result<Listing, DbError> {
        let current = Self::lock(&mut *conn, id).await?.ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
        Self::apply_delta_locked(conn, &current, delta).await
    }

    /// Apply `delta` to a listing whose row lock the caller already holds.
    pub(crate) async fn apply_delta_locked(
        conn: &mut PgConnection,
        current: &Listing,
        delta: i32,
    ) -> Result<Listing, DbError> {
        let next = apply_room_delta(current.available_rooms, current.total_rooms, delta)?;

        let query = format!(
            "UPDATE listings SET available_rooms = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(current.id)
            .bind(next)
            .fetch_one(conn)
            .await?;

        tracing::debug!(
            listing_id = current.id,
            delta,
            available_rooms = next,
            "Room count adjusted"
        );
        Ok(listing)
    }
}

//! Repository for the `bookings` table.
//!
//! Every write that moves a room in or out of a listing's inventory runs in
//! the same transaction as the booking write itself.

use gharpayy_core::booking::{validate_stay_dates, BookingStatus};
use gharpayy_core::error::CoreError;
use gharpayy_core::inventory::RESERVE_ROOM;
use gharpayy_core::listing::is_visible_to_tenants;
use gharpayy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, CreateBooking, UpdateBookingDates};
use crate::repositories::ListingRepo;
use crate::retry::with_retry;
use crate::DbError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, listing_id, owner_id, check_in_date, check_out_date, \
                       monthly_rent, security_deposit, status, created_at, updated_at";

/// Provides booking lifecycle operations.
pub struct BookingRepo;

impl BookingRepo {
    /// Reserve a room and create a `pending` booking, atomically.
    ///
    /// Owner, rent and deposit are copied from the listing. Fails with
    /// [`CoreError::Conflict`] if the listing is not approved and active, and
    /// with [`CoreError::InvariantViolation`] if it has no free room. No
    /// booking row exists after a failure.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateBooking,
    ) -> Result<Booking, DbError> {
        validate_stay_dates(input.check_in_date, input.check_out_date)?;

        with_retry("create_booking", || async move {
            let mut tx = pool.begin().await?;

            let listing = ListingRepo::lock(&mut tx, input.listing_id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Listing",
                    id: input.listing_id,
                })?;
            if !is_visible_to_tenants(listing.is_approved, listing.is_active) {
                return Err(CoreError::Conflict(format!(
                    "Listing {} is not open for booking",
                    listing.id
                ))
                .into());
            }

            ListingRepo::apply_delta_locked(&mut tx, &listing, RESERVE_ROOM).await?;

            let query = format!(
                "INSERT INTO bookings (tenant_id, listing_id, owner_id, check_in_date, \
                                       check_out_date, monthly_rent, security_deposit, status)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING {COLUMNS}"
            );
            let booking = sqlx::query_as::<_, Booking>(&query)
                .bind(tenant_id)
                .bind(listing.id)
                .bind(listing.owner_id)
                .bind(input.check_in_date)
                .bind(input.check_out_date)
                .bind(listing.rent)
                .bind(listing.security_deposit)
                .bind(BookingStatus::Pending.as_str())
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE tenants SET booking_ids = array_append(booking_ids, $2) WHERE user_id = $1",
            )
            .bind(tenant_id)
            .bind(booking.id)
            .execute(&mut *tx)
            .await?;

            sqlx::query("UPDATE owners SET total_bookings = total_bookings + 1 WHERE user_id = $1")
                .bind(listing.owner_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, DbError>(booking)
        })
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a booking to `to`.
    ///
    /// Entering `cancelled` or `completed` gives the room back to the listing
    /// in the same transaction. Illegal moves fail with
    /// [`CoreError::InvalidTransition`].
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        to: BookingStatus,
    ) -> Result<Booking, DbError> {
        with_retry("transition_booking", || async move {
            let mut tx = pool.begin().await?;

            let current = Self::lock(&mut tx, id).await?;
            let room_delta = current.status.transition(to)?;

            let query = format!(
                "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
            );
            let booking = sqlx::query_as::<_, Booking>(&query)
                .bind(id)
                .bind(to.as_str())
                .fetch_one(&mut *tx)
                .await?;

            if let Some(delta) = room_delta {
                ListingRepo::adjust_in_tx(&mut tx, booking.listing_id, delta).await?;
            }

            tx.commit().await?;
            Ok::<_, DbError>(booking)
        })
        .await
    }

    /// Reschedule a booking that has not ended yet.
    pub async fn update_dates(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBookingDates,
    ) -> Result<Booking, DbError> {
        validate_stay_dates(input.check_in_date, input.check_out_date)?;

        let mut tx = pool.begin().await?;

        let current = Self::lock(&mut tx, id).await?;
        if current.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Booking {id} is {} and can no longer be changed",
                current.status
            ))
            .into());
        }

        let query = format!(
            "UPDATE bookings SET check_in_date = $2, check_out_date = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(input.check_in_date)
            .bind(input.check_out_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn list_by_listing(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE listing_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_tenant(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE tenant_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Booking, DbError> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE");
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Booking",
                id,
            })?;
        Ok(booking)
    }
}

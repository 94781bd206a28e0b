//! Booking entity model and DTOs.

use gharpayy_core::booking::BookingStatus;
use gharpayy_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A booking row from the `bookings` table.
///
/// `owner_id`, `monthly_rent` and `security_deposit` are copied from the
/// listing when the booking is made.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub tenant_id: DbId,
    pub listing_id: DbId,
    pub owner_id: DbId,
    pub check_in_date: Date,
    pub check_out_date: Option<Date>,
    pub monthly_rent: f64,
    pub security_deposit: f64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub listing_id: DbId,
    pub check_in_date: Date,
    pub check_out_date: Option<Date>,
}

/// DTO for rescheduling a booking.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingDates {
    pub check_in_date: Date,
    pub check_out_date: Option<Date>,
}

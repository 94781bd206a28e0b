//! Listing entity model and DTOs.

use gharpayy_core::error::CoreError;
use gharpayy_core::inventory::validate_room_counts;
use gharpayy_core::listing::{Address, AmenitySet, ListingFilter, RoomType};
use gharpayy_core::types::{DbId, Timestamp};
use gharpayy_core::validation::{
    validate_amount, validate_coordinates, validate_pincode, validate_text, MAX_LONG_TEXT,
    MAX_SHORT_TEXT,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A listing row from the `listings` table.
///
/// The address is stored flattened; [`Listing::address`] reassembles it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rent: f64,
    pub security_deposit: f64,
    #[sqlx(try_from = "String")]
    pub room_type: RoomType,
    pub total_rooms: i32,
    pub available_rooms: i32,
    #[sqlx(try_from = "Vec<String>")]
    pub amenities: AmenitySet,
    pub rules: Vec<String>,
    pub images: Vec<String>,
    pub is_approved: bool,
    pub is_active: bool,
    pub rating: f64,
    pub review_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// Apply the part of `filter` that is not pushed into SQL.
    pub fn matches(&self, filter: &ListingFilter) -> bool {
        filter.matches_client_side(&self.title, &self.address(), &self.amenities)
    }
}

/// DTO for creating a new listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateListing {
    pub title: String,
    pub description: String,
    pub address: Address,
    pub rent: f64,
    pub security_deposit: f64,
    pub room_type: RoomType,
    pub total_rooms: i32,
    /// Defaults to `total_rooms` if omitted.
    pub available_rooms: Option<i32>,
    #[serde(default)]
    pub amenities: AmenitySet,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateListing {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_listing_fields(
            &self.title,
            &self.description,
            &self.address,
            self.rent,
            self.security_deposit,
        )?;
        validate_room_counts(
            self.total_rooms,
            self.available_rooms.unwrap_or(self.total_rooms),
        )
    }
}

/// DTO for replacing a listing's editable fields.
///
/// `available_rooms` is not editable; it is rebased from `total_rooms` so the
/// number of booked rooms stays the same.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateListing {
    pub title: String,
    pub description: String,
    pub address: Address,
    pub rent: f64,
    pub security_deposit: f64,
    pub room_type: RoomType,
    pub total_rooms: i32,
    #[serde(default)]
    pub amenities: AmenitySet,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub is_active: bool,
}

impl UpdateListing {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_listing_fields(
            &self.title,
            &self.description,
            &self.address,
            self.rent,
            self.security_deposit,
        )
    }
}

fn validate_listing_fields(
    title: &str,
    description: &str,
    address: &Address,
    rent: f64,
    security_deposit: f64,
) -> Result<(), CoreError> {
    validate_text("title", title, MAX_SHORT_TEXT)?;
    validate_text("description", description, MAX_LONG_TEXT)?;
    validate_text("street", &address.street, MAX_SHORT_TEXT)?;
    validate_text("city", &address.city, MAX_SHORT_TEXT)?;
    validate_text("state", &address.state, MAX_SHORT_TEXT)?;
    validate_pincode(&address.pincode)?;
    validate_coordinates(address.latitude, address.longitude)?;
    validate_amount("rent", rent)?;
    validate_amount("security_deposit", security_deposit)
}

//! Seed helpers shared by the repository integration tests.

#![allow(dead_code)]

use gharpayy_core::listing::{Address, Amenity, AmenitySet, RoomType};
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::listing::{CreateListing, Listing};
use gharpayy_db::models::user::CreateUser;
use gharpayy_db::repositories::{CredentialRepo, ListingRepo, UserRepo};
use sqlx::PgPool;

/// Create a credential, user row and role profile. Returns the user id.
pub async fn seed_user(pool: &PgPool, email: &str, role: Role) -> DbId {
    let credential = CredentialRepo::create(pool, email, "$argon2id$not-a-real-hash")
        .await
        .unwrap();
    let input = CreateUser {
        email: email.to_string(),
        name: email.split('@').next().unwrap_or("user").to_string(),
        phone_number: None,
        role,
    };
    UserRepo::create(pool, credential.id, &input).await.unwrap();
    UserRepo::create_profile(pool, credential.id, role)
        .await
        .unwrap();
    credential.id
}

pub fn listing_input(title: &str, city: &str, total_rooms: i32, available_rooms: i32) -> CreateListing {
    CreateListing {
        title: title.to_string(),
        description: "Furnished rooms with meals".to_string(),
        address: Address {
            street: "4th Cross, 5th Block".to_string(),
            city: city.to_string(),
            state: "Karnataka".to_string(),
            pincode: "560095".to_string(),
            latitude: None,
            longitude: None,
        },
        rent: 8000.0,
        security_deposit: 16000.0,
        room_type: RoomType::Shared,
        total_rooms,
        available_rooms: Some(available_rooms),
        amenities: AmenitySet::new([Amenity::Wifi, Amenity::Meals]),
        rules: vec!["No smoking".to_string()],
        images: vec![],
    }
}

/// Create a listing and approve it so tenants can see and book it.
pub async fn seed_approved_listing(
    pool: &PgPool,
    owner_id: DbId,
    total_rooms: i32,
    available_rooms: i32,
) -> Listing {
    let listing = ListingRepo::create(
        pool,
        owner_id,
        &listing_input("Koramangala PG", "Bengaluru", total_rooms, available_rooms),
    )
    .await
    .unwrap();
    ListingRepo::approve(pool, listing.id).await.unwrap().unwrap()
}

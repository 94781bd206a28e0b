//! Room inventory stays within `0..=total_rooms` across bookings.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use gharpayy_core::booking::BookingStatus;
use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_db::models::booking::CreateBooking;
use gharpayy_db::repositories::{BookingRepo, ListingRepo, OwnerRepo, TenantRepo};
use gharpayy_db::DbError;
use sqlx::PgPool;

use common::{seed_approved_listing, seed_user};

fn booking_for(listing_id: i64) -> CreateBooking {
    CreateBooking {
        listing_id,
        check_in_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        check_out_date: None,
    }
}

async fn bookings_count(pool: &PgPool, listing_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE listing_id = $1")
        .bind(listing_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_takes_one_room_and_snapshots_listing(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let tenant = seed_user(&pool, "tenant@example.com", Role::Tenant).await;
    let listing = seed_approved_listing(&pool, owner, 5, 3).await;

    let booking = BookingRepo::create(&pool, tenant, &booking_for(listing.id))
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.owner_id, owner);
    assert_eq!(booking.monthly_rent, listing.rent);
    assert_eq!(booking.security_deposit, listing.security_deposit);

    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing.available_rooms, 2);

    let tenant_profile = TenantRepo::find_by_user_id(&pool, tenant).await.unwrap().unwrap();
    assert_eq!(tenant_profile.booking_ids, vec![booking.id]);
    let owner_profile = OwnerRepo::find_by_user_id(&pool, owner).await.unwrap().unwrap();
    assert_eq!(owner_profile.total_bookings, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_listing_rejects_booking_without_creating_a_row(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let tenant = seed_user(&pool, "tenant@example.com", Role::Tenant).await;
    let listing = seed_approved_listing(&pool, owner, 4, 0).await;

    let result = BookingRepo::create(&pool, tenant, &booking_for(listing.id)).await;

    assert_matches!(result, Err(DbError::Core(CoreError::InvariantViolation(_))));
    assert_eq!(bookings_count(&pool, listing.id).await, 0);
    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing.available_rooms, 0);
    let owner_profile = OwnerRepo::find_by_user_id(&pool, owner).await.unwrap().unwrap();
    assert_eq!(owner_profile.total_bookings, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_bookings_for_the_last_room_admit_exactly_one(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let first = seed_user(&pool, "first@example.com", Role::Tenant).await;
    let second = seed_user(&pool, "second@example.com", Role::Tenant).await;
    let listing = seed_approved_listing(&pool, owner, 20, 1).await;

    let input = booking_for(listing.id);
    let (a, b) = tokio::join!(
        BookingRepo::create(&pool, first, &input),
        BookingRepo::create(&pool, second, &input),
    );

    let results = [a, b];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1, "exactly one booking should win the last room");
    assert!(results.iter().any(|r| matches!(
        r,
        Err(DbError::Core(CoreError::InvariantViolation(_)))
    )));

    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing.available_rooms, 0);
    assert_eq!(bookings_count(&pool, listing.id).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unapproved_listing_cannot_be_booked(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let tenant = seed_user(&pool, "tenant@example.com", Role::Tenant).await;
    let listing = ListingRepo::create(
        &pool,
        owner,
        &common::listing_input("Pending PG", "Pune", 3, 3),
    )
    .await
    .unwrap();

    let result = BookingRepo::create(&pool, tenant, &booking_for(listing.id)).await;
    assert_matches!(result, Err(DbError::Core(CoreError::Conflict(_))));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelling_releases_the_room(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let tenant = seed_user(&pool, "tenant@example.com", Role::Tenant).await;
    let listing = seed_approved_listing(&pool, owner, 2, 1).await;

    let booking = BookingRepo::create(&pool, tenant, &booking_for(listing.id))
        .await
        .unwrap();
    BookingRepo::transition(&pool, booking.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    let cancelled = BookingRepo::transition(&pool, booking.id, BookingStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing.available_rooms, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_releases_the_room_once(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let tenant = seed_user(&pool, "tenant@example.com", Role::Tenant).await;
    let listing = seed_approved_listing(&pool, owner, 2, 2).await;

    let booking = BookingRepo::create(&pool, tenant, &booking_for(listing.id))
        .await
        .unwrap();
    for status in [
        BookingStatus::Confirmed,
        BookingStatus::Active,
        BookingStatus::Completed,
    ] {
        BookingRepo::transition(&pool, booking.id, status).await.unwrap();
    }

    let again = BookingRepo::transition(&pool, booking.id, BookingStatus::Cancelled).await;
    assert_matches!(
        again,
        Err(DbError::Core(CoreError::InvalidTransition { .. }))
    );

    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing.available_rooms, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn adjust_available_rooms_enforces_bounds(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com", Role::Owner).await;
    let listing = seed_approved_listing(&pool, owner, 3, 3).await;

    let over = ListingRepo::adjust_available_rooms(&pool, listing.id, 1).await;
    assert_matches!(over, Err(DbError::Core(CoreError::InvariantViolation(_))));

    let taken = ListingRepo::adjust_available_rooms(&pool, listing.id, -3)
        .await
        .unwrap();
    assert_eq!(taken.available_rooms, 0);

    let under = ListingRepo::adjust_available_rooms(&pool, listing.id, -1).await;
    assert_matches!(under, Err(DbError::Core(CoreError::InvariantViolation(_))));

    let missing = ListingRepo::adjust_available_rooms(&pool, 9_999, 1).await;
    assert_matches!(missing, Err(DbError::Core(CoreError::NotFound { .. })));
}

//! Listings, moderation, reviews, favorites, inquiries and support tickets
//! over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    approved_listing, body_json, delete_auth, get_auth, listing_body, post_auth, post_json_auth,
    put_auth, put_json_auth, signed_in, signed_in_admin,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn listings_stay_hidden_until_approved(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        listing_body("Lakeview PG", "Bengaluru", 5),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let listing = body_json(response).await["data"].clone();
    assert_eq!(listing["is_approved"], false);
    assert_eq!(listing["available_rooms"], 5);
    let id = listing["id"].as_i64().unwrap();
    let uri = format!("/api/v1/listings/{id}");

    let response = get_auth(app.clone(), "/api/v1/listings", &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
    let response = get_auth(app.clone(), &uri, &tenant).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/admin/listings/pending", &admin).await;
    assert_eq!(body_json(response).await["data"][0]["id"], id);

    let response = post_auth(app.clone(), &format!("/api/v1/admin/listings/{id}/approve"), &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/listings?city=bengaluru&amenities=wifi", &tenant).await;
    assert_eq!(body_json(response).await["data"][0]["id"], id);
    let response = get_auth(app.clone(), "/api/v1/listings?amenities=wifi,gym", &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
    let response = get_auth(app.clone(), "/api/v1/listings?max_rent=5000", &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));

    let response = post_auth(app.clone(), &format!("/api/v1/admin/listings/{id}/reject"), &admin).await;
    assert_eq!(body_json(response).await["data"]["is_active"], false);
    let response = get_auth(app, "/api/v1/listings", &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_owners_manage_their_listings(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;
    let (_, rival) = signed_in(app.clone(), "rival@example.com", "owner").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        listing_body("Tenant PG", "Pune", 2),
        &tenant,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let id = approved_listing(app.clone(), &owner, &admin, 4).await;
    let uri = format!("/api/v1/listings/{id}");

    let response = delete_auth(app.clone(), &uri, &rival).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let rooms = serde_json::json!({ "delta": -1 });
    let response = post_json_auth(app.clone(), &format!("{uri}/rooms"), rooms, &owner).await;
    assert_eq!(body_json(response).await["data"]["available_rooms"], 3);

    let too_many = serde_json::json!({ "delta": 2 });
    let response = post_json_auth(app.clone(), &format!("{uri}/rooms"), too_many, &owner).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INVARIANT_VIOLATION");

    let mut update = listing_body("Sunrise PG Deluxe", "Bengaluru", 6);
    update["is_active"] = serde_json::json!(true);
    let response = put_json_auth(app.clone(), &uri, update, &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await["data"].clone();
    assert_eq!(listing["title"], "Sunrise PG Deluxe");
    assert_eq!(listing["total_rooms"], 6);
    assert_eq!(listing["available_rooms"], 5);

    let response = get_auth(app.clone(), "/api/v1/listings/mine", &owner).await;
    assert_eq!(body_json(response).await["data"][0]["id"], id);

    let response = delete_auth(app.clone(), &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(app, &uri, &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reviews_update_listing_rating(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;
    let id = approved_listing(app.clone(), &owner, &admin, 4).await;
    let uri = format!("/api/v1/listings/{id}/reviews");

    for rating in [5, 2] {
        let body = serde_json::json!({ "rating": rating, "comment": "Stayed here" });
        let response = post_json_auth(app.clone(), &uri, body, &tenant).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let out_of_range = serde_json::json!({ "rating": 6, "comment": "" });
    let response = post_json_auth(app.clone(), &uri, out_of_range, &tenant).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "rating": 4 }),
        &owner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), &uri, &owner).await;
    let reviews = body_json(response).await["data"].clone();
    let mut ratings: Vec<i64> = reviews
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["rating"].as_i64().unwrap())
        .collect();
    ratings.sort_unstable();
    assert_eq!(ratings, vec![2, 5]);

    let response = get_auth(app, &format!("/api/v1/listings/{id}"), &tenant).await;
    let listing = body_json(response).await["data"].clone();
    assert_eq!(listing["rating"], 3.5);
    assert_eq!(listing["review_count"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorites_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;
    let id = approved_listing(app.clone(), &owner, &admin, 4).await;
    let uri = format!("/api/v1/favorites/{id}");

    for _ in 0..2 {
        let response = put_auth(app.clone(), &uri, &tenant).await;
        assert_eq!(body_json(response).await["data"], serde_json::json!([id]));
    }

    let response = get_auth(app.clone(), "/api/v1/favorites", &tenant).await;
    assert_eq!(body_json(response).await["data"][0]["id"], id);

    let response = delete_auth(app.clone(), &uri, &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));

    let response = get_auth(app.clone(), "/api/v1/favorites/ids", &tenant).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));

    let response = get_auth(app, "/api/v1/favorites", &owner).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inquiries_get_one_response(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;
    let (_, rival) = signed_in(app.clone(), "rival@example.com", "owner").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;
    let listing_id = approved_listing(app.clone(), &owner, &admin, 4).await;

    let body = serde_json::json!({ "listing_id": listing_id, "message": "Is food included?" });
    let response = post_json_auth(app.clone(), "/api/v1/inquiries", body, &tenant).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let inquiry = body_json(response).await["data"].clone();
    assert_eq!(inquiry["is_read"], false);
    assert!(inquiry["response"].is_null());
    let respond_uri = format!("/api/v1/inquiries/{}/respond", inquiry["id"]);

    let answer = serde_json::json!({ "response": "Yes, three meals a day" });
    let response = post_json_auth(app.clone(), &respond_uri, answer.clone(), &rival).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app.clone(), &respond_uri, answer.clone(), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let answered = body_json(response).await["data"].clone();
    assert_eq!(answered["is_read"], true);
    assert_eq!(answered["response"], "Yes, three meals a day");
    assert!(answered["responded_at"].is_string());

    let response = post_json_auth(app.clone(), &respond_uri, answer, &owner).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(app.clone(), "/api/v1/inquiries", &tenant).await;
    assert_eq!(body_json(response).await["data"][0]["response"], "Yes, three meals a day");
    let response = get_auth(app, "/api/v1/inquiries", &owner).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn support_tickets_only_move_forward(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (_, tenant) = signed_in(app.clone(), "tenant@example.com", "tenant").await;
    let (_, other) = signed_in(app.clone(), "other@example.com", "owner").await;

    let body = serde_json::json!({
        "title": "Payment failed",
        "description": "Card was charged but booking shows pending",
        "category": "billing",
        "priority": "high",
    });
    let response = post_json_auth(app.clone(), "/api/v1/support-tickets", body, &tenant).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = body_json(response).await["data"].clone();
    assert_eq!(ticket["status"], "open");
    let uri = format!("/api/v1/support-tickets/{}", ticket["id"]);

    let response = get_auth(app.clone(), &uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "priority": "medium" }),
        &tenant,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["priority"], "medium");

    let status_uri = format!("{uri}/status");
    let response = post_json_auth(
        app.clone(),
        &status_uri,
        serde_json::json!({ "status": "in_progress" }),
        &tenant,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for status in ["in_progress", "resolved"] {
        let response = post_json_auth(
            app.clone(),
            &status_uri,
            serde_json::json!({ "status": status }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    for status in ["open", "in_progress", "resolved"] {
        let response = post_json_auth(
            app.clone(),
            &status_uri,
            serde_json::json!({ "status": status }),
            &admin,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    let response = get_auth(app.clone(), "/api/v1/support-tickets?status=resolved", &admin).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
    let response = get_auth(app, "/api/v1/support-tickets", &other).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_user_management(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;
    let (_, admin) = signed_in_admin(app.clone(), &pool, "admin@example.com").await;
    let (owner_id, owner) = signed_in(app.clone(), "owner@example.com", "owner").await;

    let response = get_auth(app.clone(), "/api/v1/admin/users", &owner).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = serde_json::json!({
        "email": "second-admin@example.com",
        "password": common::PASSWORD,
        "name": "Second Admin",
        "role": "admin",
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "admin");

    let response = get_auth(app.clone(), "/api/v1/admin/users?role=admin", &admin).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/admin/owners/{owner_id}/verify-license"),
        &admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_license_verified"], true);

    let response = get_auth(app.clone(), "/api/v1/auth/me", &owner).await;
    assert_eq!(body_json(response).await["data"]["is_verified"], true);

    let response = get_auth(app, "/api/v1/admin/events?limit=10", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gharpayy_api::auth::jwt::JwtConfig;
use gharpayy_api::auth::provider::{IdentityProvider, PgIdentityProvider};
use gharpayy_api::config::ServerConfig;
use gharpayy_api::router::build_app_router;
use gharpayy_api::state::AppState;
use gharpayy_core::roles::Role;
use gharpayy_core::types::DbId;
use gharpayy_db::models::user::CreateUser;
use gharpayy_db::repositories::UserRepo;
use gharpayy_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-9";

/// A `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        min_password_length: 8,
        max_body_bytes: 64 * 1024,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

pub async fn build_test_state(pool: PgPool) -> AppState {
    let (state, _registry) = AppState::build(pool, test_config(), Arc::new(EventBus::default()))
        .await
        .expect("state should build");
    state
}

/// The production router and middleware stack over `pool`.
pub async fn build_test_app(pool: PgPool) -> Router {
    let state = build_test_state(pool).await;
    build_app_router(state, &test_config())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Sign up through the API and return the new user's id.
pub async fn sign_up(app: Router, email: &str, role: &str) -> DbId {
    let body = serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "name": "Test User",
        "role": role,
    });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Sign in and return the full auth response.
pub async fn sign_in(app: Router, email: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/signin", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Sign up and sign in. Returns `(user_id, access_token)`.
pub async fn signed_in(app: Router, email: &str, role: &str) -> (DbId, String) {
    let id = sign_up(app.clone(), email, role).await;
    let auth = sign_in(app, email).await;
    (id, auth["access_token"].as_str().unwrap().to_string())
}

/// Admins cannot sign up; create one directly.
pub async fn signed_in_admin(app: Router, pool: &PgPool, email: &str) -> (DbId, String) {
    let provider = PgIdentityProvider::new(pool.clone(), 8);
    let id = provider.create_account(email, PASSWORD).await.unwrap();
    UserRepo::create(
        pool,
        id,
        &CreateUser {
            email: email.to_string(),
            name: "Admin".to_string(),
            phone_number: None,
            role: Role::Admin,
        },
    )
    .await
    .unwrap();
    let auth = sign_in(app, email).await;
    (id, auth["access_token"].as_str().unwrap().to_string())
}

/// Body for a listing with `total_rooms` rooms.
pub fn listing_body(title: &str, city: &str, total_rooms: i32) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Clean rooms near the metro",
        "address": {
            "street": "12 MG Road",
            "city": city,
            "state": "Karnataka",
            "pincode": "560001",
        },
        "rent": 9000.0,
        "security_deposit": 18000.0,
        "room_type": "shared",
        "total_rooms": total_rooms,
        "amenities": ["wifi", "meals"],
    })
}

/// Owner publishes a listing and an admin approves it. Returns the listing id.
pub async fn approved_listing(
    app: Router,
    owner_token: &str,
    admin_token: &str,
    total_rooms: i32,
) -> DbId {
    let response = post_json_auth(
        app.clone(),
        "/api/v1/listings",
        listing_body("Sunrise PG", "Bengaluru", total_rooms),
        owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_auth(
        app,
        &format!("/api/v1/admin/listings/{id}/approve"),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    id
}

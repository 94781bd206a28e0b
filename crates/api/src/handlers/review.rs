//! Handlers for `/listings/{id}/reviews`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gharpayy_core::types::DbId;
use gharpayy_db::models::review::CreateReview;
use gharpayy_db::repositories::ReviewRepo;
use gharpayy_events::{event_types, PlatformEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireTenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /listings/{id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct AddReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub comment: String,
}

/// POST /api/v1/listings/{id}/reviews
///
/// Append a review and refresh the listing's rating and review count.
pub async fn add_review(
    RequireTenant(auth): RequireTenant,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
    Json(input): Json<AddReviewRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let create = CreateReview {
        rating: input.rating,
        comment: input.comment.trim().to_string(),
    };
    let (review, listing) = ReviewRepo::add(&state.pool, auth.user_id, listing_id, &create).await?;

    tracing::info!(
        review_id = review.id,
        listing_id,
        rating = review.rating,
        listing_rating = listing.rating,
        review_count = listing.review_count,
        "Review added"
    );
    state.event_bus.publish(
        PlatformEvent::new(event_types::REVIEW_ADDED)
            .with_source("review", review.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "listing_id": listing_id,
                "rating": review.rating,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/listings/{id}/reviews
pub async fn list_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(listing_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reviews = ReviewRepo::list_by_listing(&state.pool, listing_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

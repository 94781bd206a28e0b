//! Review ratings and listing aggregates.

use serde::Serialize;

use crate::error::CoreError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}

/// Aggregate rating stored on a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub rating: f64,
    pub review_count: i32,
}

impl RatingSummary {
    pub const EMPTY: RatingSummary = RatingSummary {
        rating: 0.0,
        review_count: 0,
    };

    /// Arithmetic mean over every rating; `0.0` when there are none.
    pub fn from_ratings(ratings: &[i16]) -> Self {
        if ratings.is_empty() {
            return Self::EMPTY;
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        Self {
            rating: sum as f64 / ratings.len() as f64,
            review_count: ratings.len() as i32,
        }
    }

    /// The summary after one more review, `(m * k + r) / (k + 1)`.
    pub fn with_review(self, rating: i16) -> Self {
        let k = f64::from(self.review_count);
        Self {
            rating: (self.rating * k + f64::from(rating)) / (k + 1.0),
            review_count: self.review_count + 1,
        }
    }
}

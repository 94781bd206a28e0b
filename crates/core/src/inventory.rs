//! Room inventory arithmetic.
//!
//! Every listing keeps `0 <= available_rooms <= total_rooms`. The database
//! layer calls these functions inside the same transaction that holds the
//! listing row lock, so the check and the write are one atomic step.

use crate::error::CoreError;

/// Delta applied when a booking takes a room.
pub const RESERVE_ROOM: i32 = -1;

/// Delta applied when a booking gives its room back.
pub const RELEASE_ROOM: i32 = 1;

/// Validate a freshly entered pair of room counts.
pub fn validate_room_counts(total_rooms: i32, available_rooms: i32) -> Result<(), CoreError> {
    if total_rooms <= 0 {
        return Err(CoreError::Validation(
            "total_rooms must be greater than zero".to_string(),
        ));
    }
    if available_rooms < 0 || available_rooms > total_rooms {
        return Err(CoreError::Validation(format!(
            "available_rooms must be between 0 and {total_rooms}, got {available_rooms}"
        )));
    }
    Ok(())
}

/// Apply `delta` to the available room count.
///
/// Returns the new count, or [`CoreError::InvariantViolation`] when the result
/// would fall outside `0..=total_rooms`.
pub fn apply_room_delta(available_rooms: i32, total_rooms: i32, delta: i32) -> Result<i32, CoreError> {
    let next = available_rooms
        .checked_add(delta)
        .ok_or_else(|| CoreError::InvariantViolation("room count overflow".to_string()))?;

    if next < 0 {
        return Err(CoreError::InvariantViolation(
            "No rooms available for this listing".to_string(),
        ));
    }
    if next > total_rooms {
        return Err(CoreError::InvariantViolation(format!(
            "Available rooms cannot exceed total rooms ({total_rooms})"
        )));
    }
    Ok(next)
}

/// Recompute `available_rooms` when an owner changes `total_rooms`.
///
/// The number of occupied rooms (`total - available`) is held constant, so
/// shrinking below the occupied count is an invariant violation.
pub fn rebase_available_rooms(
    old_total: i32,
    old_available: i32,
    new_total: i32,
) -> Result<i32, CoreError> {
    if new_total <= 0 {
        return Err(CoreError::Validation(
            "total_rooms must be greater than zero".to_string(),
        ));
    }
    let occupied = old_total - old_available;
    let available = new_total - occupied;
    if available < 0 {
        return Err(CoreError::InvariantViolation(format!(
            "total_rooms cannot drop below the {occupied} rooms currently booked"
        )));
    }
    Ok(available)
}

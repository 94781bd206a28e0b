//! Field-level input validation shared by the DB and API layers.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length for short free-text fields (names, titles).
pub const MAX_SHORT_TEXT: usize = 200;

/// Maximum length for long free-text fields (descriptions, messages).
pub const MAX_LONG_TEXT: usize = 5000;

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{email}' is not a valid email address")))
    }
}

/// Reject empty or whitespace-only values and values longer than `max_len` characters.
pub fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Phone numbers: optional leading `+`, then 10 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{phone}' is not a valid phone number")))
    }
}

/// Indian PIN codes are six digits.
pub fn validate_pincode(pincode: &str) -> Result<(), CoreError> {
    if pincode.len() == 6 && pincode.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("'{pincode}' is not a valid pincode")))
    }
}

/// Money amounts must be finite and non-negative.
pub fn validate_amount(field: &str, amount: f64) -> Result<(), CoreError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("{field} must be a non-negative amount")))
    }
}

pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), CoreError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) => {
            Ok(())
        }
        (Some(_), Some(_)) => Err(CoreError::Validation(
            "latitude/longitude out of range".to_string(),
        )),
        _ => Err(CoreError::Validation(
            "latitude and longitude must be given together".to_string(),
        )),
    }
}

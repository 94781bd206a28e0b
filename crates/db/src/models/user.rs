//! User entity model and DTOs.

use gharpayy_core::error::CoreError;
use gharpayy_core::roles::Role;
use gharpayy_core::types::{DbId, Timestamp};
use gharpayy_core::validation::{validate_email, validate_phone, validate_text, MAX_SHORT_TEXT};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table. The id is the credential id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub profile_image_url: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user record for an existing credential.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub role: Role,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_email(&self.email)?;
        validate_text("name", &self.name, MAX_SHORT_TEXT)?;
        if let Some(phone) = &self.phone_number {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

/// DTO for the self-service profile edit. Replaces all three fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
}

impl UpdateProfile {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_text("name", &self.name, MAX_SHORT_TEXT)?;
        if let Some(phone) = &self.phone_number {
            validate_phone(phone)?;
        }
        Ok(())
    }
}

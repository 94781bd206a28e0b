//! Credential and password-reset rows owned by the identity provider.

use gharpayy_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `credentials` table.
///
/// Contains the password hash -- never serialize this.
#[derive(Debug, Clone, FromRow)]
pub struct Credential {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `password_resets` table.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub credential_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

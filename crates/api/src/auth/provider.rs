//! The credential store behind sign-up and sign-in.
//!
//! [`IdentityProvider`] is the seam between the gateway and whatever owns
//! passwords. [`PgIdentityProvider`] keeps them in the `credentials` table.

use async_trait::async_trait;
use chrono::Utc;
use gharpayy_core::error::CoreError;
use gharpayy_core::types::DbId;
use gharpayy_core::validation::validate_email;
use gharpayy_db::models::session::RevokedSession;
use gharpayy_db::repositories::{CredentialRepo, PasswordResetRepo, SessionRepo};
use gharpayy_db::DbPool;

use crate::auth::jwt::{generate_opaque_token, hash_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};

/// Maximum consecutive failed sign-ins before the credential is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// How long a credential stays locked after too many failures.
pub const LOCK_DURATION_MINS: i64 = 15;

/// Lifetime of a password reset token.
const RESET_TOKEN_TTL_MINS: i64 = 60;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Issues and checks identities. Identity ids double as user ids.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new credential and return its id.
    async fn create_account(&self, email: &str, password: &str) -> AppResult<DbId>;

    /// Check an email/password pair and return the identity id.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<DbId>;

    /// Issue a one-time reset token for `email`.
    ///
    /// Returns `None` when no credential has that email.
    async fn send_password_reset(&self, email: &str) -> AppResult<Option<String>>;

    /// Spend a reset token and set a new password. Returns the identity id.
    async fn complete_password_reset(&self, token: &str, new_password: &str) -> AppResult<DbId>;

    /// End every session of the identity. Returns the sessions it revoked.
    async fn sign_out(&self, identity_id: DbId) -> AppResult<Vec<RevokedSession>>;
}

/// Postgres-backed provider using argon2 hashes.
pub struct PgIdentityProvider {
    pool: DbPool,
    min_password_length: usize,
}

impl PgIdentityProvider {
    pub fn new(pool: DbPool, min_password_length: usize) -> Self {
        Self {
            pool,
            min_password_length,
        }
    }

    fn check_strength(&self, password: &str) -> AppResult<()> {
        validate_password_strength(password, self.min_password_length)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
    }
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password).map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<DbId> {
        validate_email(email)?;
        self.check_strength(password)?;

        if CredentialRepo::find_by_email(&self.pool, email).await?.is_some() {
            return Err(AppError::Core(CoreError::Conflict(
                "An account with this email already exists".into(),
            )));
        }

        let password_hash = hash(password)?;
        let credential = CredentialRepo::create(&self.pool, email, &password_hash).await?;
        Ok(credential.id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> AppResult<DbId> {
        let credential = CredentialRepo::find_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

        if let Some(locked_until) = credential.locked_until {
            if locked_until > Utc::now() {
                return Err(AppError::Core(CoreError::Forbidden(
                    "Account is temporarily locked. Try again later.".into(),
                )));
            }
        }

        let password_valid = verify_password(password, &credential.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

        if !password_valid {
            let updated = CredentialRepo::record_failed_login(
                &self.pool,
                credential.id,
                MAX_FAILED_ATTEMPTS,
                chrono::Duration::minutes(LOCK_DURATION_MINS),
            )
            .await?;
            tracing::warn!(
                credential_id = credential.id,
                failed_login_count = updated.failed_login_count,
                locked = updated.locked_until.is_some(),
                "Failed sign-in"
            );
            return Err(AppError::Core(CoreError::Unauthorized(
                INVALID_CREDENTIALS.into(),
            )));
        }

        CredentialRepo::record_successful_login(&self.pool, credential.id).await?;
        Ok(credential.id)
    }

    async fn send_password_reset(&self, email: &str) -> AppResult<Option<String>> {
        let Some(credential) = CredentialRepo::find_by_email(&self.pool, email).await? else {
            return Ok(None);
        };

        let (token, token_hash) = generate_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS);
        PasswordResetRepo::create(&self.pool, credential.id, &token_hash, expires_at).await?;

        Ok(Some(token))
    }

    async fn complete_password_reset(&self, token: &str, new_password: &str) -> AppResult<DbId> {
        self.check_strength(new_password)?;

        let reset = PasswordResetRepo::consume(&self.pool, &hash_token(token))
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid or expired reset token".into(),
                ))
            })?;

        let password_hash = hash(new_password)?;
        CredentialRepo::update_password(&self.pool, reset.credential_id, &password_hash).await?;
        Ok(reset.credential_id)
    }

    async fn sign_out(&self, identity_id: DbId) -> AppResult<Vec<RevokedSession>> {
        Ok(SessionRepo::revoke_all_for_user(&self.pool, identity_id).await?)
    }
}

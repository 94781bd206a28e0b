//! Repositories for the `credentials` and `password_resets` tables.

use chrono::Duration;
use gharpayy_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::credential::{Credential, PasswordReset};

const COLUMNS: &str =
    "id, email, password_hash, failed_login_count, locked_until, created_at, updated_at";

const RESET_COLUMNS: &str = "id, credential_id, token_hash, expires_at, used_at, created_at";

/// Email/password credentials. Emails are unique case-insensitively.
pub struct CredentialRepo;

impl CredentialRepo {
    /// Insert a credential. A duplicate email fails with the
    /// `uq_credentials_email` unique violation.
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<Credential, sqlx::Error> {
        let query = format!(
            "INSERT INTO credentials (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Credential>(&query)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Credential>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credentials WHERE id = $1");
        sqlx::query_as::<_, Credential>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive lookup.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Credential>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM credentials WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, Credential>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Count a failed sign-in and lock the credential once `max_attempts`
    /// consecutive failures are reached. Returns the updated row.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_for: Duration,
    ) -> Result<Credential, sqlx::Error> {
        let query = format!(
            "UPDATE credentials SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN NOW() + make_interval(secs => $3)
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Credential>(&query)
            .bind(id)
            .bind(max_attempts)
            .bind(lock_for.num_seconds() as f64)
            .fetch_one(pool)
            .await
    }

    /// Clear the failure counter and any lock after a successful sign-in.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE credentials SET failed_login_count = 0, locked_until = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Replace the stored hash. Returns `true` if the credential exists.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE credentials SET password_hash = $2, failed_login_count = 0, locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// One-time password reset tokens. Only the token digest is stored.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    pub async fn create(
        pool: &PgPool,
        credential_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (credential_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {RESET_COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(credential_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Mark an unused, unexpired token as used and return it.
    ///
    /// Returns `None` when the token is unknown, expired or already spent.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!(
            "UPDATE password_resets SET used_at = NOW()
             WHERE token_hash = $1 AND used_at IS NULL AND expires_at > NOW()
             RETURNING {RESET_COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }
}

//! Repository for the `user_sessions` table.

use gharpayy_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, RevokedSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, refresh_token_hash, expires_at, is_revoked, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Spend a refresh token: revoke its session and return the row.
    ///
    /// Lookup and revocation are one statement, so of several concurrent
    /// callers holding the same token only one gets `Some`.
    pub async fn consume_refresh_token(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke all active sessions for a user.
    pub async fn revoke_all_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RevokedSession>, sqlx::Error> {
        sqlx::query_as::<_, RevokedSession>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false
             RETURNING id, expires_at",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Sessions that are revoked but not yet expired.
    ///
    /// Loaded at startup so access tokens from those sessions stay rejected.
    pub async fn list_revoked_unexpired(pool: &PgPool) -> Result<Vec<RevokedSession>, sqlx::Error> {
        sqlx::query_as::<_, RevokedSession>(
            "SELECT id, expires_at FROM user_sessions WHERE is_revoked = true AND expires_at > NOW()",
        )
        .fetch_all(pool)
        .await
    }

    /// Delete expired sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

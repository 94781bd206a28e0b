//! Bounded retry with exponential backoff for transient database failures.
//!
//! Used around the short transactions that guard room inventory. Domain
//! errors are never retried.

use std::future::Future;
use std::time::Duration;

use crate::error::DbError;

/// Backoff before each retry (50 ms, 100 ms, 200 ms).
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// PostgreSQL `serialization_failure`.
const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL `deadlock_detected`.
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";

/// Whether retrying the same operation could succeed.
pub fn is_transient(err: &DbError) -> bool {
    match err {
        DbError::Core(_) => false,
        DbError::Sqlx(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)) => true,
        DbError::Sqlx(sqlx::Error::Database(db_err)) => matches!(
            db_err.code().as_deref(),
            Some(SQLSTATE_SERIALIZATION_FAILURE | SQLSTATE_DEADLOCK_DETECTED)
        ),
        DbError::Sqlx(_) => false,
    }
}

/// Run `op`, retrying transient failures up to three times.
pub async fn with_retry<T, F, Fut>(operation: &'static str, mut op: F) -> Result<T, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbError>>,
{
    for (attempt, delay_ms) in RETRY_DELAYS_MS.iter().enumerate() {
        match op().await {
            Err(e) if is_transient(&e) => {
                tracing::warn!(
                    operation,
                    attempt = attempt + 1,
                    error = %e,
                    "Transient database failure, retrying"
                );
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            }
            result => return result,
        }
    }

    op().await.inspect_err(|e| {
        if is_transient(e) {
            tracing::error!(operation, error = %e, "Database operation failed after all retries");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use assert_matches::assert_matches;
    use gharpayy_core::error::CoreError;

    use super::*;

    #[test]
    fn domain_errors_are_not_transient() {
        let err = DbError::Core(CoreError::InvariantViolation("full".into()));
        assert!(!is_transient(&err));
        assert!(!is_transient(&DbError::Sqlx(sqlx::Error::RowNotFound)));
        assert!(is_transient(&DbError::Sqlx(sqlx::Error::PoolTimedOut)));
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        let calls = AtomicUsize::new(0);
        let result = with_retry("test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbError::Sqlx(sqlx::Error::PoolTimedOut))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbError::Sqlx(sqlx::Error::PoolTimedOut)) }
        })
        .await;

        assert_matches!(result, Err(DbError::Sqlx(sqlx::Error::PoolTimedOut)));
        assert_eq!(calls.load(Ordering::SeqCst), RETRY_DELAYS_MS.len() + 1);
    }

    #[tokio::test]
    async fn domain_errors_return_immediately() {
        let calls = AtomicUsize::new(0);
        let result: Result<(), _> = with_retry("test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbError::Core(CoreError::InvariantViolation("full".into()))) }
        })
        .await;

        assert_matches!(result, Err(DbError::Core(CoreError::InvariantViolation(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

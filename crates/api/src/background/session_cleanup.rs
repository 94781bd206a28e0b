//! Periodic deletion of expired sessions, in storage and in the registry.

use std::time::Duration;

use gharpayy_db::repositories::SessionRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::auth::session::SessionRegistry;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Delete `user_sessions` rows past their expiry and prune the matching
/// revocations from `sessions`, until `cancel` fires.
pub async fn run(pool: PgPool, sessions: SessionRegistry, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Session cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged expired sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
                sessions.prune();
            }
        }
    }
}

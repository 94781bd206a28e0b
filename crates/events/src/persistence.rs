//! Writes the marketplace audit trail.
//!
//! Every [`PlatformEvent`] on the bus becomes one row in `events`, which the
//! admin event feed reads back. Inserts go through [`with_retry`], so a
//! pool timeout during a booking burst does not lose the event.

use gharpayy_core::types::DbId;
use gharpayy_db::repositories::EventRepo;
use gharpayy_db::retry::with_retry;
use gharpayy_db::{DbError, DbPool};
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// What one persistence run did, reported when the bus closes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceStats {
    pub written: u64,
    pub failed: u64,
    /// Events dropped because the receiver fell behind the bus.
    pub skipped: u64,
}

pub struct EventPersistence;

impl EventPersistence {
    /// Drain `receiver` into the `events` table until the bus is dropped.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<PlatformEvent>,
    ) -> PersistenceStats {
        let mut stats = PersistenceStats::default();

        loop {
            match receiver.recv().await {
                Ok(event) => match Self::persist(&pool, &event).await {
                    Ok(_) => stats.written += 1,
                    Err(e) => {
                        stats.failed += 1;
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            source_id = ?event.source_entity_id,
                            "Event not recorded"
                        );
                    }
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    stats.skipped += n;
                    tracing::warn!(skipped = n, "Audit writer fell behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        tracing::info!(
            written = stats.written,
            failed = stats.failed,
            skipped = stats.skipped,
            "Event bus closed, audit writer stopped"
        );
        stats
    }

    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, DbError> {
        with_retry("persist_event", || async move {
            Ok(EventRepo::insert(
                pool,
                &event.event_type,
                event.source_entity_type.as_deref(),
                event.source_entity_id,
                event.actor_user_id,
                &event.payload,
            )
            .await?)
        })
        .await
    }
}

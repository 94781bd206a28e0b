//! Process-wide view of which sessions are no longer valid.
//!
//! Access tokens are stateless, so a signed-out session's token would stay
//! usable until it expires. The registry closes that window: the request
//! extractor consults it on every call.
//!
//! The revoked set is written by exactly one task. Everything else sends it
//! [`AuthStateChange`] messages over a channel and reads through a shared
//! `RwLock`. An entry is kept only until its session would have expired
//! anyway; [`SessionRegistry::prune`] drops the lapsed ones.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use gharpayy_core::types::{DbId, Timestamp};
use gharpayy_db::models::session::RevokedSession;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;

/// An authentication event reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStateChange {
    SignedIn { user_id: DbId, session_id: DbId },
    SignedOut { user_id: DbId, sessions: Vec<RevokedSession> },
    /// A single session ended, e.g. by refresh-token rotation.
    SessionRevoked(RevokedSession),
}

enum Command {
    Change(AuthStateChange),
    Prune(Timestamp),
    Flush(oneshot::Sender<()>),
}

type RevokedMap = Arc<RwLock<HashMap<DbId, Timestamp>>>;

/// Cheaply cloneable handle to the revoked-session set.
#[derive(Clone)]
pub struct SessionRegistry {
    revoked: RevokedMap,
    tx: mpsc::UnboundedSender<Command>,
}

impl SessionRegistry {
    /// Spawn the registry task, seeded with sessions already revoked in storage.
    ///
    /// The task exits once every handle has been dropped.
    pub fn start(initial_revoked: impl IntoIterator<Item = RevokedSession>) -> (Self, JoinHandle<()>) {
        let revoked = Arc::new(RwLock::new(
            initial_revoked
                .into_iter()
                .map(|s| (s.id, s.expires_at))
                .collect::<HashMap<_, _>>(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(Arc::clone(&revoked), rx));
        (Self { revoked, tx }, handle)
    }

    /// Queue a change. Applied asynchronously; see [`flush`](Self::flush).
    pub fn notify(&self, change: AuthStateChange) {
        if self.tx.send(Command::Change(change)).is_err() {
            tracing::warn!("Session registry is not running; auth state change dropped");
        }
    }

    /// Forget revocations whose sessions have expired.
    pub fn prune(&self) {
        self.prune_at(Utc::now());
    }

    fn prune_at(&self, now: Timestamp) {
        if self.tx.send(Command::Prune(now)).is_err() {
            tracing::warn!("Session registry is not running; prune skipped");
        }
    }

    /// Wait until every change queued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    pub async fn is_revoked(&self, session_id: DbId) -> bool {
        self.revoked.read().await.contains_key(&session_id)
    }

    #[cfg(test)]
    async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }
}

async fn run(revoked: RevokedMap, mut rx: mpsc::UnboundedReceiver<Command>) {
    tracing::info!("Session registry started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::Change(AuthStateChange::SignedIn { user_id, session_id }) => {
                tracing::debug!(user_id, session_id, "Session started");
            }
            Command::Change(AuthStateChange::SignedOut { user_id, sessions }) => {
                tracing::debug!(user_id, sessions = sessions.len(), "User signed out");
                revoked
                    .write()
                    .await
                    .extend(sessions.into_iter().map(|s| (s.id, s.expires_at)));
            }
            Command::Change(AuthStateChange::SessionRevoked(session)) => {
                revoked.write().await.insert(session.id, session.expires_at);
            }
            Command::Prune(now) => {
                let mut map = revoked.write().await;
                let before = map.len();
                map.retain(|_, expires_at| *expires_at > now);
                let pruned = before - map.len();
                if pruned > 0 {
                    tracing::debug!(pruned, remaining = map.len(), "Pruned expired revocations");
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }

    tracing::info!("Session registry stopped");
}

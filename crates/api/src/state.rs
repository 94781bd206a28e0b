use std::sync::Arc;

use gharpayy_db::repositories::SessionRepo;
use gharpayy_events::EventBus;
use tokio::task::JoinHandle;

use crate::auth::gateway::IdentityGateway;
use crate::auth::provider::PgIdentityProvider;
use crate::auth::session::SessionRegistry;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gharpayy_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Publishes domain events after each mutation.
    pub event_bus: Arc<EventBus>,
    /// Revoked sessions, consulted by the auth extractor.
    pub sessions: SessionRegistry,
    pub identity: Arc<IdentityGateway>,
}

impl AppState {
    /// Wire up the identity gateway and start the session registry.
    ///
    /// The registry is seeded with sessions revoked before this process
    /// started. The returned handle finishes once the state is dropped.
    pub async fn build(
        pool: gharpayy_db::DbPool,
        config: ServerConfig,
        event_bus: Arc<EventBus>,
    ) -> Result<(Self, JoinHandle<()>), sqlx::Error> {
        let revoked = SessionRepo::list_revoked_unexpired(&pool).await?;
        tracing::info!(revoked = revoked.len(), "Loaded revoked sessions");
        let (sessions, registry_handle) = SessionRegistry::start(revoked);

        let provider = Arc::new(PgIdentityProvider::new(
            pool.clone(),
            config.min_password_length,
        ));
        let identity = Arc::new(IdentityGateway::new(
            pool.clone(),
            provider,
            config.jwt.clone(),
            sessions.clone(),
            Arc::clone(&event_bus),
        ));

        let state = Self {
            pool,
            config: Arc::new(config),
            event_bus,
            sessions,
            identity,
        };
        Ok((state, registry_handle))
    }
}

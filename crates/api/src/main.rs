use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gharpayy_api::background::session_cleanup;
use gharpayy_api::config::{pool_config_from_env, ServerConfig};
use gharpayy_api::router::build_app_router;
use gharpayy_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gharpayy_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool_config = pool_config_from_env();

    let pool = gharpayy_db::create_pool(&database_url, &pool_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!(
        max_connections = pool_config.max_connections,
        "Database connection pool created"
    );

    gharpayy_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    gharpayy_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(gharpayy_events::EventBus::default());
    let persistence_handle = tokio::spawn(gharpayy_events::EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Event persistence started");

    // --- App state ---
    let (state, registry_handle) =
        AppState::build(pool.clone(), config.clone(), Arc::clone(&event_bus))
            .await
            .expect("Failed to initialise application state");

    // --- Session cleanup ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(session_cleanup::run(
        pool,
        state.sessions.clone(),
        cleanup_cancel.clone(),
    ));

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(grace, cleanup_handle).await;

    // The router (and with it the last registry handle) is gone by now.
    let _ = tokio::time::timeout(grace, registry_handle).await;

    // Dropping the last bus handle closes the channel and ends persistence.
    // The gateway held a clone, released with the router above.
    drop(event_bus);
    let _ = tokio::time::timeout(grace, persistence_handle).await;
    tracing::info!("Background services shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

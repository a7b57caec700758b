use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use typeboard_core::store::PlayerStore;
use typeboard_db::{PgChangeListener, PgPlayerStore};
use typeboard_events::ChangeBus;
use typeboard_sync::MemoryPlayerStore;

use typeboard_api::config::{ServerConfig, StoreBackend};
use typeboard_api::router::build_app_router;
use typeboard_api::state::AppState;
use typeboard_api::telemetry::init_tracing;
use typeboard_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(
        host = %config.host,
        port = config.port,
        backend = ?config.store_backend,
        "Loaded server configuration",
    );

    // Cancelled once the HTTP server has drained.
    let background_cancel = CancellationToken::new();

    // --- Store ---
    let (store, listener_handle) = connect_store(&config, &background_cancel).await;

    // --- Controller ---
    let state = AppState::new(store, config.clone());
    state.controller.start().await;
    tracing::info!(
        players = state.controller.snapshot().players.len(),
        "Leaderboard controller started",
    );

    // --- WebSocket push + heartbeat ---
    let push_handle = ws::start_roster_push(
        Arc::clone(&state.controller),
        Arc::clone(&state.ws_manager),
        background_cancel.clone(),
    );
    let heartbeat_handle =
        ws::start_heartbeat(Arc::clone(&state.ws_manager), background_cancel.clone());

    // --- Router ---
    let app = build_app_router(state.clone(), &config);

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

    state.controller.dispose();
    background_cancel.cancel();

    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(grace, push_handle).await;
    let _ = tokio::time::timeout(grace, heartbeat_handle).await;
    if let Some(handle) = listener_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    tracing::info!("Background tasks stopped");

    let ws_count = state.ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    state.ws_manager.shutdown_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Build the configured store. For PostgreSQL this also applies migrations
/// and spawns the change listener feeding the store's bus.
async fn connect_store(
    config: &ServerConfig,
    cancel: &CancellationToken,
) -> (Arc<dyn PlayerStore>, Option<JoinHandle<()>>) {
    match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set");

            let pool = typeboard_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            typeboard_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            typeboard_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let bus = Arc::new(ChangeBus::default());
            let listener = PgChangeListener::new(pool.clone(), Arc::clone(&bus));
            let handle = tokio::spawn(listener.run(cancel.clone()));

            (Arc::new(PgPlayerStore::new(pool, bus)), Some(handle))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; the roster is lost on restart");
            (Arc::new(MemoryPlayerStore::new()), None)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

use std::sync::Arc;

use typeboard_core::store::PlayerStore;
use typeboard_sync::LeaderboardController;

use crate::config::ServerConfig;
use crate::inflight::InFlight;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (everything is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The process-wide roster cache every view reads from.
    pub controller: Arc<LeaderboardController>,
    /// The store behind `controller`, used directly only for health probes.
    pub store: Arc<dyn PlayerStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (live leaderboard clients).
    pub ws_manager: Arc<WsManager>,
    /// Admin mutations currently running.
    pub in_flight: Arc<InFlight>,
}

impl AppState {
    /// Assemble state around a store, creating a fresh (not yet started)
    /// controller for it.
    pub fn new(store: Arc<dyn PlayerStore>, config: ServerConfig) -> Self {
        Self {
            controller: LeaderboardController::new(Arc::clone(&store)),
            store,
            config: Arc::new(config),
            ws_manager: Arc::new(WsManager::new()),
            in_flight: Arc::new(InFlight::new()),
        }
    }
}

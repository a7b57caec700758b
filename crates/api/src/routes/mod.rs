pub mod admin;
pub mod health;
pub mod leaderboard;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  live roster push (WebSocket)
///
/// /leaderboard                         public leaderboard view
///
/// /admin/session                       status, unlock, lock
/// /admin/dashboard                     totals and averages (admin)
/// /admin/players                       list, create (admin)
/// /admin/players/{id}                  get, update, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .merge(leaderboard::router())
        .nest("/admin", admin::router())
}

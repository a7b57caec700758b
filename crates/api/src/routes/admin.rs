//! Route definitions for the `/admin` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{admin, players};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// Everything except `/session` requires the admin flag (enforced by
/// handler extractors).
///
/// ```text
/// GET    /session                 -> session_status
/// POST   /session                 -> unlock
/// DELETE /session                 -> lock
/// GET    /dashboard               -> dashboard
/// GET    /players                 -> list_players
/// POST   /players                 -> create_player
/// GET    /players/{id}            -> get_player
/// PUT    /players/{id}            -> update_player
/// DELETE /players/{id}            -> delete_player (?confirm=true)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            get(admin::session_status)
                .post(admin::unlock)
                .delete(admin::lock),
        )
        .route("/dashboard", get(admin::dashboard))
        .route(
            "/players",
            get(players::list_players).post(players::create_player),
        )
        .route(
            "/players/{id}",
            get(players::get_player)
                .put(players::update_player)
                .delete(players::delete_player),
        )
}

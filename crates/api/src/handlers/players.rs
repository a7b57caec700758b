//! Handlers for `/admin/players` (roster management).
//!
//! All handlers require the admin flag via [`RequireAdmin`]. Writes go
//! through the [`LeaderboardController`], so every successful change is
//! followed by a full roster reload before the response is sent.
//!
//! [`LeaderboardController`]: typeboard_sync::LeaderboardController

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use typeboard_core::error::CoreError;
use typeboard_core::player::{Player, PlayerInput, PlayerPatch};
use typeboard_core::types::PlayerId;
use typeboard_sync::RosterSnapshot;

use crate::error::{AppError, AppResult};
use crate::inflight::MutationTarget;
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `DELETE /admin/players/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    /// Must be `true`; deletes are not taken on a bare request.
    pub confirm: Option<bool>,
}

/// Result of `PUT /admin/players/{id}`.
#[derive(Debug, Serialize)]
pub struct PlayerUpdated {
    pub affected: u64,
    /// The row from the reloaded roster. `None` if the reload failed.
    pub player: Option<Player>,
}

fn find_player(snapshot: &RosterSnapshot, id: PlayerId) -> Option<Player> {
    snapshot.players.iter().find(|p| p.id == id).cloned()
}

fn not_found(id: PlayerId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Player",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/players
///
/// The cached roster with its loading and error flags.
pub async fn list_players(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Json<DataResponse<RosterSnapshot>> {
    Json(DataResponse {
        data: state.controller.snapshot(),
    })
}

/// GET /api/v1/admin/players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<PlayerId>,
) -> AppResult<Json<DataResponse<Player>>> {
    let player = find_player(&state.controller.snapshot(), id).ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: player }))
}

/// POST /api/v1/admin/players
///
/// Add a player. Returns 201 with the row as inserted; its `rank` is
/// `null` until the roster reload picks up the store-assigned value.
pub async fn create_player(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<PlayerInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Player>>)> {
    let _guard = state.in_flight.begin(MutationTarget::Create)?;

    let player = state.controller.add_player(input).await?;
    tracing::info!(player_id = %player.id, name = %player.name, "Player created via admin");

    Ok((StatusCode::CREATED, Json(DataResponse { data: player })))
}

/// PUT /api/v1/admin/players/{id}
///
/// Change any of `name`, `wpm`, `accuracy`. Absent fields stay as they are.
pub async fn update_player(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<PlayerId>,
    Json(patch): Json<PlayerPatch>,
) -> AppResult<Json<DataResponse<PlayerUpdated>>> {
    if patch.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one of name, wpm, accuracy is required".into(),
        )));
    }
    let _guard = state.in_flight.begin(MutationTarget::Player(id))?;

    let affected = state.controller.update_player(id, patch).await?;
    if affected == 0 {
        return Err(not_found(id));
    }
    tracing::info!(player_id = %id, "Player updated via admin");

    Ok(Json(DataResponse {
        data: PlayerUpdated {
            affected,
            player: find_player(&state.controller.snapshot(), id),
        },
    }))
}

/// DELETE /api/v1/admin/players/{id}?confirm=true
///
/// Remove a player. Deleting an unknown id succeeds.
pub async fn delete_player(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<PlayerId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    if params.confirm != Some(true) {
        return Err(AppError::BadRequest(
            "Deleting a player must be confirmed with ?confirm=true".into(),
        ));
    }
    let _guard = state.in_flight.begin(MutationTarget::Player(id))?;

    let affected = state.controller.delete_player(id).await?;
    tracing::info!(player_id = %id, affected, "Player deleted via admin");

    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the public leaderboard.

use axum::extract::State;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::LeaderboardView;

/// GET /api/v1/leaderboard
///
/// Current leaderboard page as served from the controller cache. Never
/// fails: a store outage shows up as `status: "failed"` with a banner.
pub async fn get_leaderboard(State(state): State<AppState>) -> Json<DataResponse<LeaderboardView>> {
    let snapshot = state.controller.snapshot();
    Json(DataResponse {
        data: LeaderboardView::from_snapshot(&snapshot),
    })
}

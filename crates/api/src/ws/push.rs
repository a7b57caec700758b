//! Fan-out of controller state changes to WebSocket clients.

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use typeboard_sync::{LeaderboardController, RosterSnapshot};

use crate::ws::manager::WsManager;

/// `type` field of roster frames.
pub const MSG_TYPE_ROSTER: &str = "roster";

/// `{"type":"roster","data":{players, loading, error}}` as a text frame.
pub fn roster_frame(snapshot: &RosterSnapshot) -> Message {
    let payload = json!({
        "type": MSG_TYPE_ROSTER,
        "data": snapshot,
    });
    Message::Text(payload.to_string().into())
}

/// Spawn a task that broadcasts a roster frame on every controller state
/// change, until `cancel` fires.
///
/// Transitions that happen faster than the task runs are coalesced; clients
/// always end up with the latest state.
pub fn start_roster_push(
    controller: Arc<LeaderboardController>,
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let mut rx = controller.watch();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = rx.borrow_and_update().snapshot();
                    let delivered = ws_manager.broadcast(roster_frame(&snapshot)).await;
                    tracing::trace!(
                        delivered,
                        players = snapshot.players.len(),
                        loading = snapshot.loading,
                        "Roster pushed",
                    );
                }
            }
        }
        tracing::debug!("Roster push stopped");
    })
}

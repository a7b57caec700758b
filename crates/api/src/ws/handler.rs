use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use typeboard_sync::LeaderboardController;
use uuid::Uuid;

use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::push::roster_frame;

/// GET /api/v1/ws
///
/// Upgrade to a WebSocket that streams roster frames.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager, state.controller))
}

/// Serve one connection: initial snapshot, then whatever the manager
/// queues, until either side closes.
async fn handle_socket(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    controller: Arc<LeaderboardController>,
) {
    let conn_id = Uuid::new_v4();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id).await;
    let (mut sink, mut stream) = socket.split();

    if sink
        .send(roster_frame(&controller.snapshot()))
        .await
        .is_err()
    {
        ws_manager.remove(&conn_id).await;
        tracing::debug!(conn_id = %conn_id, "WebSocket closed before initial frame");
        return;
    }

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    // Clients only send pongs and close frames; anything else is ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

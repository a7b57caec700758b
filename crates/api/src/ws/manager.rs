use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use typeboard_core::types::Timestamp;
use uuid::Uuid;

/// Channel sender half for pushing frames to one WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One live leaderboard viewer.
pub struct WsConnection {
    pub sender: WsSender,
    pub connected_at: Timestamp,
}

/// Registry of connected leaderboard viewers.
///
/// Thread-safe via interior `RwLock`; shared as `Arc<WsManager>`.
pub struct WsManager {
    connections: RwLock<HashMap<Uuid, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection and return the receiver its writer task drains.
    pub async fn add(&self, conn_id: Uuid) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &Uuid) {
        if let Some(conn) = self.connections.write().await.remove(conn_id) {
            let connected_for = chrono::Utc::now() - conn.connected_at;
            tracing::debug!(
                conn_id = %conn_id,
                connected_secs = connected_for.num_seconds(),
                "WebSocket connection removed",
            );
        }
    }

    /// Send `message` to every connection. Returns how many accepted it.
    ///
    /// Closed channels are skipped; their reader loop removes them.
    pub async fn broadcast(&self, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then forget them all.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connection.
    pub async fn ping_all(&self) {
        self.broadcast(Message::Ping(Bytes::new())).await;
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

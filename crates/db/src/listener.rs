//! Relay from PostgreSQL `LISTEN/NOTIFY` to the in-process [`ChangeBus`].

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgListener;
use tokio_util::sync::CancellationToken;
use typeboard_events::{ChangeBus, RosterChange};

use crate::DbPool;

/// Channel written by the `players_notify_change` trigger.
pub const PLAYERS_CHANNEL: &str = "players_changed";

/// Delay before re-establishing a failed listener connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Why [`PgChangeListener::pump`] returned.
enum PumpExit {
    Cancelled,
    ConnectionLost,
    Failed,
}

/// Background service that forwards `players_changed` notifications.
///
/// Every notification becomes one [`RosterChange`] on the bus. Whenever the
/// listener connection is re-established a [`RosterChange::resync`] is
/// published, because notifications sent while disconnected are lost.
pub struct PgChangeListener {
    pool: DbPool,
    bus: Arc<ChangeBus>,
}

impl PgChangeListener {
    pub fn new(pool: DbPool, bus: Arc<ChangeBus>) -> Self {
        Self { pool, bus }
    }

    /// Run until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut reconnecting = false;

        loop {
            match self.listen().await {
                Ok(mut listener) => {
                    tracing::info!(channel = PLAYERS_CHANNEL, "Listening for player changes");
                    if reconnecting {
                        self.bus.publish(RosterChange::resync());
                    }
                    reconnecting = true;

                    match self.pump(&mut listener, &cancel).await {
                        PumpExit::Cancelled => break,
                        // Reconnect straight away; only failed connects back off.
                        PumpExit::ConnectionLost => continue,
                        PumpExit::Failed => {}
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to start player change listener");
                }
            }

            reconnecting = true;
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(RECONNECT_DELAY) => {}
            }
        }

        tracing::info!("Player change listener stopped");
    }

    async fn listen(&self) -> Result<PgListener, sqlx::Error> {
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(PLAYERS_CHANNEL).await?;
        Ok(listener)
    }

    /// Forward notifications until cancelled or the connection goes away.
    ///
    /// A lost connection goes back to [`run`](Self::run), which re-issues
    /// `LISTEN` before publishing the resync.
    async fn pump(&self, listener: &mut PgListener, cancel: &CancellationToken) -> PumpExit {
        loop {
            tokio::select! {
                () = cancel.cancelled() => return PumpExit::Cancelled,
                result = listener.try_recv() => match result {
                    Ok(Some(notification)) => self.forward(notification.payload()),
                    Ok(None) => {
                        tracing::warn!("Player change listener lost its connection");
                        return PumpExit::ConnectionLost;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Player change listener failed");
                        return PumpExit::Failed;
                    }
                }
            }
        }
    }

    fn forward(&self, payload: &str) {
        match serde_json::from_str::<RosterChange>(payload) {
            Ok(change) => {
                tracing::debug!(op = ?change.op, player_id = ?change.player_id, "Player change notified");
                self.bus.publish(change);
            }
            Err(e) => {
                tracing::warn!(error = %e, payload, "Undecodable player change payload");
                self.bus.publish(RosterChange::resync());
            }
        }
    }
}

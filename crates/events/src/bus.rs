//! In-process change bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ChangeBus`] is the fan-out point between a store's notification
//! transport and every subscriber. It is shared via `Arc<ChangeBus>`.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use typeboard_core::types::PlayerId;

// ---------------------------------------------------------------------------
// RosterChange
// ---------------------------------------------------------------------------

/// Kind of row change observed on the player collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
    /// Emitted after the transport reconnects; events may have been missed.
    Resync,
}

/// A change observed on the player collection.
///
/// Deserializes directly from the `players_changed` notification payload,
/// e.g. `{"op":"INSERT","id":"6f1c..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterChange {
    pub op: ChangeOp,

    /// Affected row, when the transport reports one.
    #[serde(rename = "id", default)]
    pub player_id: Option<PlayerId>,
}

impl RosterChange {
    pub fn new(op: ChangeOp, player_id: Option<PlayerId>) -> Self {
        Self { op, player_id }
    }

    pub fn resync() -> Self {
        Self::new(ChangeOp::Resync, None)
    }
}

// ---------------------------------------------------------------------------
// ChangeBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for [`RosterChange`]s.
pub struct ChangeBus {
    sender: broadcast::Sender<RosterChange>,
}

impl ChangeBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed changes are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers.
    ///
    /// Dropped silently when nobody is subscribed.
    pub fn publish(&self, change: RosterChange) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RosterChange> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

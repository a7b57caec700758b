//! The Store Client seam.
//!
//! [`PlayerStore`] abstracts the external persistent collection of players
//! together with its change-notification channel. The PostgreSQL backend
//! lives in `typeboard-db`; an in-memory backend lives in `typeboard-sync`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::player::{Player, PlayerInput, PlayerPatch};
use crate::types::PlayerId;

/// Failure reported by a store backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store refused the write because a constraint was violated.
    #[error("Store rejected the write: {0}")]
    Rejected(String),

    /// The store could not be reached (connection, pool, or I/O failure).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but the query failed.
    #[error("Store query failed: {0}")]
    Query(String),
}

/// Callback invoked once per observed remote change. Carries no payload;
/// the receiver is expected to call [`PlayerStore::list`] again.
pub type OnChange = Arc<dyn Fn() + Send + Sync>;

/// Handle for an active change subscription.
///
/// Cancelling is idempotent. After [`cancel`](Subscription::cancel) returns,
/// no further callbacks are issued. Dropping the handle does **not** cancel:
/// the listener keeps running until the process exits.
#[derive(Debug, Clone)]
pub struct Subscription {
    token: CancellationToken,
}

impl Subscription {
    /// Wrap the token observed by the task that delivers callbacks.
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// Detach the subscription.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// External player store: four operations plus a change subscription.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// All players ordered by ascending `rank`, unranked rows last.
    async fn list(&self) -> Result<Vec<Player>, StoreError>;

    /// Create one player and return the row as inserted.
    async fn insert(&self, input: &PlayerInput) -> Result<Player, StoreError>;

    /// Update the editable fields present in `patch`.
    ///
    /// Returns the number of rows affected; `0` when `id` matches nothing.
    async fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<u64, StoreError>;

    /// Delete the player matching `id`.
    ///
    /// Returns the number of rows affected; `0` when `id` matches nothing.
    async fn remove(&self, id: PlayerId) -> Result<u64, StoreError>;

    /// Register `on_change` for every insert, update, or delete on the
    /// player collection, in transport delivery order, without deduplication.
    fn subscribe(&self, on_change: OnChange) -> Subscription;

    /// Cheap liveness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        self.list().await.map(|_| ())
    }
}

//! Leaderboard Data Controller.
//!
//! [`LeaderboardController`] owns the only in-process copy of the roster.
//! It never patches that copy locally: every successful mutation, every
//! remote change notification, and every manual [`refetch`] replaces it
//! with a fresh `list()` from the store.
//!
//! Views read through [`snapshot`] or follow [`watch`] for push updates.
//!
//! [`refetch`]: LeaderboardController::refetch
//! [`snapshot`]: LeaderboardController::snapshot
//! [`watch`]: LeaderboardController::watch

use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use typeboard_core::error::CoreError;
use typeboard_core::player::{Player, PlayerInput, PlayerPatch};
use typeboard_core::store::{OnChange, PlayerStore, Subscription};
use typeboard_core::types::PlayerId;

use crate::state::{RosterSnapshot, RosterState};

/// Shared roster cache. Create once per process via [`new`](Self::new) and
/// clone the `Arc` into every view.
pub struct LeaderboardController {
    store: Arc<dyn PlayerStore>,
    state: watch::Sender<RosterState>,
    subscription: Mutex<Option<Subscription>>,
}

impl LeaderboardController {
    /// Build an `Uninitialized` controller over `store`.
    pub fn new(store: Arc<dyn PlayerStore>) -> Arc<Self> {
        let (state, _) = watch::channel(RosterState::Uninitialized);
        Arc::new(Self {
            store,
            state,
            subscription: Mutex::new(None),
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Subscribe to store changes (once) and load the roster.
    ///
    /// A failed initial load leaves the controller in `Failed`; the error
    /// is logged and not returned.
    pub async fn start(self: &Arc<Self>) {
        self.ensure_subscribed();
        self.reload().await;
    }

    /// Detach from store change notifications.
    ///
    /// The current state stays readable. Mutations and [`refetch`] keep
    /// working; only remote changes stop triggering reloads.
    ///
    /// [`refetch`]: Self::refetch
    pub fn dispose(&self) {
        let taken = self.lock_subscription().take();
        if let Some(subscription) = taken {
            subscription.cancel();
            tracing::info!("Leaderboard controller detached from store changes");
        }
    }

    fn ensure_subscribed(self: &Arc<Self>) {
        let mut slot = self.lock_subscription();
        if slot.is_some() {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let on_change: OnChange = Arc::new(move || {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            tokio::spawn(async move {
                tracing::debug!("Roster change observed, reloading");
                controller.reload().await;
            });
        });

        *slot = Some(self.store.subscribe(on_change));
        tracing::info!("Leaderboard controller subscribed to store changes");
    }

    fn lock_subscription(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current state, cloned.
    pub fn state(&self) -> RosterState {
        self.state.borrow().clone()
    }

    /// `{players, loading, error}` for views.
    pub fn snapshot(&self) -> RosterSnapshot {
        self.state.borrow().snapshot()
    }

    /// Receiver notified on every state transition.
    pub fn watch(&self) -> watch::Receiver<RosterState> {
        self.state.subscribe()
    }

    /// Reload the roster from the store.
    ///
    /// On failure the controller moves to `Failed` and the error is also
    /// returned to the caller.
    pub async fn refetch(&self) -> Result<(), CoreError> {
        self.state.send_modify(|state| *state = state.begin_loading());

        match self.store.list().await {
            Ok(players) => {
                tracing::debug!(count = players.len(), "Roster loaded");
                self.state.send_replace(RosterState::Ready(Arc::new(players)));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load roster");
                self.state.send_replace(RosterState::Failed(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// [`refetch`](Self::refetch) for paths that only report through state.
    async fn reload(&self) {
        let _ = self.refetch().await;
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Validate and insert a player, then reload.
    ///
    /// Returns the row as the store inserted it. Its `rank` is not yet
    /// assigned; read ranks from the reloaded roster.
    pub async fn add_player(&self, input: PlayerInput) -> Result<Player, CoreError> {
        input.validate()?;

        let player = self.store.insert(&input).await?;
        tracing::info!(player_id = %player.id, name = %player.name, "Player added");

        self.reload().await;
        Ok(player)
    }

    /// Validate the present fields and update a player, then reload.
    ///
    /// Returns the number of rows affected; `0` means `id` matched nothing.
    pub async fn update_player(&self, id: PlayerId, patch: PlayerPatch) -> Result<u64, CoreError> {
        patch.validate()?;

        let affected = self.store.update(id, &patch).await?;
        tracing::info!(player_id = %id, affected, "Player updated");

        self.reload().await;
        Ok(affected)
    }

    /// Delete a player, then reload.
    ///
    /// Deleting an id that does not exist succeeds with `0`.
    pub async fn delete_player(&self, id: PlayerId) -> Result<u64, CoreError> {
        let affected = self.store.remove(id).await?;
        tracing::info!(player_id = %id, affected, "Player deleted");

        self.reload().await;
        Ok(affected)
    }
}

//! In-memory [`PlayerStore`].
//!
//! Mirrors the `players` table: the same CHECK constraints, the same rank
//! recompute after every statement, and one change notification per
//! affected row (none for rank-only changes).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use typeboard_core::player::{Player, PlayerInput, PlayerPatch, MAX_ACCURACY, MAX_NAME_LENGTH};
use typeboard_core::ranking::assign_ranks;
use typeboard_core::store::{OnChange, PlayerStore, StoreError, Subscription};
use typeboard_core::types::PlayerId;
use typeboard_events::{spawn_subscription, ChangeBus, ChangeOp, RosterChange};
use uuid::Uuid;

/// Process-local store, kept sorted by rank.
#[derive(Clone, Default)]
pub struct MemoryPlayerStore {
    rows: Arc<RwLock<Vec<Player>>>,
    bus: Arc<ChangeBus>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus on which this store announces its changes.
    pub fn bus(&self) -> &Arc<ChangeBus> {
        &self.bus
    }

    fn announce(&self, op: ChangeOp, id: PlayerId) {
        self.bus.publish(RosterChange::new(op, Some(id)));
    }
}

/// Enforce the table's CHECK constraints on a full row.
fn check_row(name: &str, wpm: f64, accuracy: f64) -> Result<(), StoreError> {
    let violated = if name.trim().is_empty() {
        Some("ck_players_name_not_blank")
    } else if name.chars().count() > MAX_NAME_LENGTH {
        Some("ck_players_name_length")
    } else if !(wpm >= 0.0 && wpm.is_finite()) {
        Some("ck_players_wpm_range")
    } else if !(0.0..=MAX_ACCURACY).contains(&accuracy) {
        Some("ck_players_accuracy_range")
    } else {
        None
    };

    match violated {
        Some(constraint) => Err(StoreError::Rejected(format!(
            "violates constraint {constraint}"
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn list(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, input: &PlayerInput) -> Result<Player, StoreError> {
        check_row(&input.name, input.wpm, input.accuracy)?;

        let now = Utc::now();
        let player = Player {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            wpm: input.wpm,
            accuracy: input.accuracy,
            rank: None,
            created_at: now,
            updated_at: now,
        };

        {
            let mut rows = self.rows.write().await;
            rows.push(player.clone());
            assign_ranks(&mut rows);
        }

        tracing::debug!(player_id = %player.id, name = %player.name, "Player row inserted");
        self.announce(ChangeOp::Insert, player.id);
        Ok(player)
    }

    async fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<u64, StoreError> {
        let changed = {
            let mut rows = self.rows.write().await;
            let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
                return Ok(0);
            };

            let name = patch.name.clone().unwrap_or_else(|| row.name.clone());
            let wpm = patch.wpm.unwrap_or(row.wpm);
            let accuracy = patch.accuracy.unwrap_or(row.accuracy);
            check_row(&name, wpm, accuracy)?;

            let changed = name != row.name || wpm != row.wpm || accuracy != row.accuracy;
            if changed {
                row.name = name;
                row.wpm = wpm;
                row.accuracy = accuracy;
                row.updated_at = Utc::now();
                assign_ranks(&mut rows);
            }
            changed
        };

        tracing::debug!(player_id = %id, changed, "Player row updated");
        if changed {
            self.announce(ChangeOp::Update, id);
        }
        Ok(1)
    }

    async fn remove(&self, id: PlayerId) -> Result<u64, StoreError> {
        let affected = {
            let mut rows = self.rows.write().await;
            let before = rows.len();
            rows.retain(|p| p.id != id);
            let affected = (before - rows.len()) as u64;
            if affected > 0 {
                assign_ranks(&mut rows);
            }
            affected
        };

        tracing::debug!(player_id = %id, affected, "Player row deleted");
        if affected > 0 {
            self.announce(ChangeOp::Delete, id);
        }
        Ok(affected)
    }

    fn subscribe(&self, on_change: OnChange) -> Subscription {
        spawn_subscription(self.bus.subscribe(), on_change)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

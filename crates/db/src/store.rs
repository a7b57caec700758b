//! [`PlayerStore`] backed by PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use typeboard_core::player::{Player, PlayerInput, PlayerPatch};
use typeboard_core::store::{OnChange, PlayerStore, StoreError, Subscription};
use typeboard_core::types::PlayerId;
use typeboard_events::{spawn_subscription, ChangeBus};

use crate::error::classify;
use crate::repositories::PlayerRepo;
use crate::DbPool;

/// PostgreSQL Store Client.
///
/// Subscriptions are served from `bus`, which a [`PgChangeListener`] feeds
/// from the `players_changed` channel. Without a running listener,
/// subscribers never fire.
///
/// [`PgChangeListener`]: crate::PgChangeListener
#[derive(Clone)]
pub struct PgPlayerStore {
    pool: DbPool,
    bus: Arc<ChangeBus>,
}

impl PgPlayerStore {
    pub fn new(pool: DbPool, bus: Arc<ChangeBus>) -> Self {
        Self { pool, bus }
    }
}

#[async_trait]
impl PlayerStore for PgPlayerStore {
    async fn list(&self) -> Result<Vec<Player>, StoreError> {
        let rows = PlayerRepo::list(&self.pool).await.map_err(classify)?;
        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn insert(&self, input: &PlayerInput) -> Result<Player, StoreError> {
        let row = PlayerRepo::create(&self.pool, input)
            .await
            .map_err(classify)?;
        tracing::debug!(player_id = %row.id, name = %row.name, "Player row inserted");
        Ok(row.into())
    }

    async fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<u64, StoreError> {
        let affected = PlayerRepo::update(&self.pool, id, patch)
            .await
            .map_err(classify)?;
        tracing::debug!(player_id = %id, affected, "Player row updated");
        Ok(affected)
    }

    async fn remove(&self, id: PlayerId) -> Result<u64, StoreError> {
        let affected = PlayerRepo::delete(&self.pool, id)
            .await
            .map_err(classify)?;
        tracing::debug!(player_id = %id, affected, "Player row deleted");
        Ok(affected)
    }

    fn subscribe(&self, on_change: OnChange) -> Subscription {
        spawn_subscription(self.bus.subscribe(), on_change)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await.map_err(classify)
    }
}

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use typeboard_core::player::{Player, PlayerInput, PlayerPatch};
use typeboard_core::store::{OnChange, PlayerStore, StoreError, Subscription};
use typeboard_core::types::PlayerId;
use typeboard_sync::{MemoryPlayerStore, RosterState};

/// [`MemoryPlayerStore`] wrapper that counts calls and can be told to fail.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryPlayerStore,
    pub lists: AtomicUsize,
    pub writes: AtomicUsize,
    pub fail_lists: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn set_fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn write_guard(&self) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerStore for CountingStore {
    async fn list(&self) -> Result<Vec<Player>, StoreError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        self.inner.list().await
    }

    async fn insert(&self, input: &PlayerInput) -> Result<Player, StoreError> {
        self.write_guard()?;
        self.inner.insert(input).await
    }

    async fn update(&self, id: PlayerId, patch: &PlayerPatch) -> Result<u64, StoreError> {
        self.write_guard()?;
        self.inner.update(id, patch).await
    }

    async fn remove(&self, id: PlayerId) -> Result<u64, StoreError> {
        self.write_guard()?;
        self.inner.remove(id).await
    }

    fn subscribe(&self, on_change: OnChange) -> Subscription {
        self.inner.subscribe(on_change)
    }
}

pub fn input(name: &str, wpm: f64, accuracy: f64) -> PlayerInput {
    PlayerInput {
        name: name.to_string(),
        wpm,
        accuracy,
    }
}

/// Wait until the controller reaches a state matching `pred`.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<RosterState>,
    pred: impl FnMut(&RosterState) -> bool,
) -> RosterState {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(pred))
        .await
        .expect("timed out waiting for roster state")
        .expect("controller dropped")
        .clone()
}

/// Let spawned subscription tasks run.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

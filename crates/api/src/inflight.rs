//! Overlap guard for admin mutations.
//!
//! While a create, or a mutation on a given player, is in flight, a second
//! request for the same target is refused with `409 Conflict` instead of
//! queueing behind the first.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use typeboard_core::error::CoreError;
use typeboard_core::types::PlayerId;

/// What a mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTarget {
    /// `POST /admin/players`.
    Create,
    /// `PUT` or `DELETE` on one player.
    Player(PlayerId),
}

/// Set of targets with a mutation currently running.
#[derive(Debug, Default)]
pub struct InFlight {
    targets: Mutex<HashSet<MutationTarget>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target` until the returned guard is dropped.
    pub fn begin(self: &Arc<Self>, target: MutationTarget) -> Result<InFlightGuard, CoreError> {
        if !self.lock().insert(target) {
            tracing::debug!(?target, "Mutation already in flight");
            return Err(CoreError::Conflict(
                "Another change to this record is still being processed".into(),
            ));
        }
        Ok(InFlightGuard {
            owner: Arc::clone(self),
            target,
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<MutationTarget>> {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases its target on drop, including when the handler future is
/// cancelled by the request timeout.
#[derive(Debug)]
pub struct InFlightGuard {
    owner: Arc<InFlight>,
    target: MutationTarget,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.owner.lock().remove(&self.target);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn same_target_conflicts_until_released() {
        let in_flight = Arc::new(InFlight::new());
        let id = Uuid::new_v4();

        let guard = in_flight.begin(MutationTarget::Player(id)).unwrap();
        assert_matches!(
            in_flight.begin(MutationTarget::Player(id)),
            Err(CoreError::Conflict(_))
        );

        drop(guard);
        assert!(in_flight.begin(MutationTarget::Player(id)).is_ok());
    }

    #[test]
    fn different_targets_do_not_conflict() {
        let in_flight = Arc::new(InFlight::new());

        let _a = in_flight.begin(MutationTarget::Player(Uuid::new_v4())).unwrap();
        let _b = in_flight.begin(MutationTarget::Player(Uuid::new_v4())).unwrap();
        let _c = in_flight.begin(MutationTarget::Create).unwrap();

        assert_matches!(
            in_flight.begin(MutationTarget::Create),
            Err(CoreError::Conflict(_))
        );
    }
}

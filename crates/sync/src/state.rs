//! Controller state machine and its read-only projection.

use std::sync::Arc;

use serde::Serialize;
use typeboard_core::player::Player;

/// Shared, immutable roster as last returned by the store.
pub type Roster = Arc<Vec<Player>>;

/// Lifecycle of the cached roster.
///
/// ```text
/// Uninitialized -> Loading -> Ready(roster)
///                          -> Failed(error)
/// Ready | Failed -> Loading  (mutation, remote change, manual refetch)
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RosterState {
    /// `start()` has not been called yet.
    #[default]
    Uninitialized,

    /// A `list()` call is in flight. `stale` holds the roster from the
    /// previous `Ready` state, if any, so views can keep showing it.
    Loading { stale: Option<Roster> },

    /// The latest `list()` succeeded.
    Ready(Roster),

    /// The latest `list()` failed. Any previous roster is discarded.
    Failed(String),
}

impl RosterState {
    /// The roster a view should display right now.
    pub fn roster(&self) -> Option<&Roster> {
        match self {
            RosterState::Ready(roster) => Some(roster),
            RosterState::Loading { stale } => stale.as_ref(),
            RosterState::Uninitialized | RosterState::Failed(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RosterState::Loading { .. })
    }

    /// Enter `Loading`, carrying the current roster along as stale data.
    pub(crate) fn begin_loading(&self) -> RosterState {
        RosterState::Loading {
            stale: self.roster().cloned(),
        }
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            players: self.roster().map(|r| r.as_ref().clone()).unwrap_or_default(),
            loading: self.is_loading(),
            error: match self {
                RosterState::Failed(msg) => Some(msg.clone()),
                _ => None,
            },
        }
    }
}

/// What views read: `{players, loading, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSnapshot {
    pub players: Vec<Player>,
    pub loading: bool,
    pub error: Option<String>,
}

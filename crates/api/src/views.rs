//! Leaderboard view model.
//!
//! Turns a [`RosterSnapshot`] into what the public leaderboard page renders:
//! a page status, an optional podium, and one display row per player.

use serde::Serialize;
use typeboard_core::player::Player;
use typeboard_core::standing::{format_accuracy, rank_label, StandingTier, PODIUM_SIZE};
use typeboard_core::types::PlayerId;
use typeboard_sync::RosterSnapshot;

/// Which state the page is in. Checked in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    /// The last load failed; `error` carries the banner text.
    Failed,
    /// A load is in flight; `entries` may hold the previous roster.
    Loading,
    /// Loaded, nobody on the board yet.
    Empty,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub wpm: f64,
    pub accuracy: f64,
    /// Accuracy with one decimal and a percent sign, e.g. `"97.5%"`.
    pub accuracy_label: String,
    pub rank: Option<i32>,
    /// Rank number, or [`RANK_PLACEHOLDER`](typeboard_core::standing::RANK_PLACEHOLDER) while the store has not ranked the row.
    pub rank_label: String,
    pub tier: StandingTier,
    /// Trophy or medal icon next to the badge (ranks 1-3).
    pub medal: bool,
}

impl From<&Player> for LeaderboardEntry {
    fn from(p: &Player) -> Self {
        let tier = StandingTier::for_rank(p.rank);
        Self {
            id: p.id,
            name: p.name.clone(),
            wpm: p.wpm,
            accuracy: p.accuracy,
            accuracy_label: format_accuracy(p.accuracy),
            rank: p.rank,
            rank_label: rank_label(p.rank),
            tier,
            medal: tier.is_podium(),
        }
    }
}

/// One podium step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodiumSpot {
    /// 1, 2 or 3.
    pub place: usize,
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardView {
    pub status: ViewStatus,
    pub error: Option<String>,
    /// Top three in display order (2nd, 1st, 3rd). Empty below three players.
    pub podium: Vec<PodiumSpot>,
    pub entries: Vec<LeaderboardEntry>,
}

impl LeaderboardView {
    pub fn from_snapshot(snapshot: &RosterSnapshot) -> Self {
        let entries: Vec<LeaderboardEntry> =
            snapshot.players.iter().map(LeaderboardEntry::from).collect();

        let status = if snapshot.error.is_some() {
            ViewStatus::Failed
        } else if snapshot.loading {
            ViewStatus::Loading
        } else if entries.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        };

        Self {
            status,
            error: snapshot.error.clone(),
            podium: podium(&entries),
            entries,
        }
    }
}

/// Second place on the left, winner in the middle, third on the right.
fn podium(entries: &[LeaderboardEntry]) -> Vec<PodiumSpot> {
    if entries.len() < PODIUM_SIZE {
        return Vec::new();
    }
    [1, 0, 2]
        .into_iter()
        .map(|index| PodiumSpot {
            place: index + 1,
            entry: entries[index].clone(),
        })
        .collect()
}

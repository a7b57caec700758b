//! Display treatment for leaderboard positions.

use serde::Serialize;

/// Shown in place of a number when a row has no rank yet.
pub const RANK_PLACEHOLDER: &str = "—";

/// Number of entries that receive podium treatment.
pub const PODIUM_SIZE: usize = 3;

/// Highest rank that still counts as "top ten".
const TOP_TEN_CUTOFF: i32 = 10;

/// Visual tier of a leaderboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingTier {
    Gold,
    Silver,
    Bronze,
    TopTen,
    Standard,
    Unranked,
}

impl StandingTier {
    pub fn for_rank(rank: Option<i32>) -> Self {
        match rank {
            None => StandingTier::Unranked,
            Some(1) => StandingTier::Gold,
            Some(2) => StandingTier::Silver,
            Some(3) => StandingTier::Bronze,
            Some(r) if r <= TOP_TEN_CUTOFF => StandingTier::TopTen,
            Some(_) => StandingTier::Standard,
        }
    }

    /// Whether this tier belongs on the podium.
    pub fn is_podium(self) -> bool {
        matches!(
            self,
            StandingTier::Gold | StandingTier::Silver | StandingTier::Bronze
        )
    }
}

/// Text for the rank badge: the number, or [`RANK_PLACEHOLDER`].
pub fn rank_label(rank: Option<i32>) -> String {
    match rank {
        Some(r) if r > 0 => r.to_string(),
        _ => RANK_PLACEHOLDER.to_string(),
    }
}

/// Accuracy as shown to users, e.g. `"96.0%"`.
pub fn format_accuracy(accuracy: f64) -> String {
    format!("{accuracy:.1}%")
}

//! Leaderboard ordering.
//!
//! The PostgreSQL trigger in `db/migrations` is the source of truth for
//! `rank`. These functions express the same ordering for the in-memory
//! store and for anything that needs to sort rows the way `list()` does.

use std::cmp::Ordering;

use crate::player::Player;

/// Order two players by standing: `wpm` desc, then `accuracy` desc, then
/// `created_at` asc, then `id` asc.
pub fn compare_standing(a: &Player, b: &Player) -> Ordering {
    b.wpm
        .total_cmp(&a.wpm)
        .then_with(|| b.accuracy.total_cmp(&a.accuracy))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Order two players the way `list()` returns them: `rank` asc, nulls last.
pub fn compare_listing(a: &Player, b: &Player) -> Ordering {
    match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_standing(a, b),
    }
}

/// Recompute `rank` for the full roster, leaving it sorted by standing.
///
/// Ranks are consecutive positions starting at 1; ties on every key are
/// broken by creation order so the result is deterministic.
pub fn assign_ranks(players: &mut [Player]) {
    players.sort_by(compare_standing);
    for (position, player) in players.iter_mut().enumerate() {
        player.rank = Some(position as i32 + 1);
    }
}

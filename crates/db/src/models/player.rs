//! Row mapping for the `players` table.

use sqlx::FromRow;
use typeboard_core::player::Player;
use typeboard_core::types::{PlayerId, Timestamp};

/// A row from the `players` table.
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub name: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub rank: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player {
            id: row.id,
            name: row.name,
            wpm: row.wpm,
            accuracy: row.accuracy,
            rank: row.rank,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

//! Repository for the `players` table.
//!
//! Writes never touch `rank`; the `trg_players_rank` trigger recomputes it
//! after every statement that changes `wpm` or `accuracy`, or that inserts
//! or deletes rows.

use sqlx::PgPool;
use typeboard_core::player::{PlayerInput, PlayerPatch};
use typeboard_core::types::PlayerId;

use crate::models::player::PlayerRow;

/// Column list for `players` queries.
const COLUMNS: &str = "id, name, wpm, accuracy, rank, created_at, updated_at";

/// Provides data access for leaderboard players.
pub struct PlayerRepo;

impl PlayerRepo {
    /// List every player by rank, unranked rows last.
    pub async fn list(pool: &PgPool) -> Result<Vec<PlayerRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM players \
             ORDER BY rank ASC NULLS LAST, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, PlayerRow>(&query).fetch_all(pool).await
    }

    /// Find a player by ID.
    pub async fn find_by_id(pool: &PgPool, id: PlayerId) -> Result<Option<PlayerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a player.
    ///
    /// The returned row reflects the insert itself; its `rank` is assigned by
    /// the statement-level trigger afterwards and is therefore `NULL` here.
    pub async fn create(pool: &PgPool, input: &PlayerInput) -> Result<PlayerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO players (name, wpm, accuracy) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlayerRow>(&query)
            .bind(&input.name)
            .bind(input.wpm)
            .bind(input.accuracy)
            .fetch_one(pool)
            .await
    }

    /// Partially update a player.
    ///
    /// Uses `COALESCE` so only provided fields are changed. Returns the number
    /// of rows affected (`0` when `id` does not exist).
    pub async fn update(pool: &PgPool, id: PlayerId, patch: &PlayerPatch) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE players SET \
                 name = COALESCE($2, name), \
                 wpm = COALESCE($3, wpm), \
                 accuracy = COALESCE($4, accuracy) \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(patch.wpm)
        .bind(patch.accuracy)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a player by ID. Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: PlayerId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Count all players.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(pool)
            .await
    }
}

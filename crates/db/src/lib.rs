//! PostgreSQL Store Client for the leaderboard.
//!
//! Provides the connection pool, migrations, the `players` repository, the
//! [`PgPlayerStore`] implementation of
//! [`PlayerStore`](typeboard_core::store::PlayerStore), and the
//! [`PgChangeListener`] that relays `LISTEN/NOTIFY` traffic onto a
//! [`ChangeBus`](typeboard_events::ChangeBus).

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod listener;
pub mod models;
pub mod repositories;
pub mod store;

pub use listener::PgChangeListener;
pub use store::PgPlayerStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

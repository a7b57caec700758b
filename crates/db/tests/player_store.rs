//! Database-level tests for the `players` table, its triggers, and
//! [`PgPlayerStore`].
//!
//! Each test gets a fresh database with migrations applied by `sqlx::test`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use futures::future::join_all;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use typeboard_core::player::{PlayerInput, PlayerPatch};
use typeboard_core::store::{OnChange, PlayerStore, StoreError};
use typeboard_db::repositories::PlayerRepo;
use typeboard_db::{PgChangeListener, PgPlayerStore};
use typeboard_events::{ChangeBus, ChangeOp};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn input(name: &str, wpm: f64, accuracy: f64) -> PlayerInput {
    PlayerInput {
        name: name.to_string(),
        wpm,
        accuracy,
    }
}

fn store(pool: PgPool) -> PgPlayerStore {
    PgPlayerStore::new(pool, Arc::new(ChangeBus::default()))
}

async fn ranked_names(store: &PgPlayerStore) -> Vec<(String, Option<i32>)> {
    store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.name, p.rank))
        .collect()
}

// ---------------------------------------------------------------------------
// Test: trigger ranks by wpm desc, accuracy desc
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn trigger_ranks_by_wpm_then_accuracy(pool: PgPool) {
    let store = store(pool);
    store.insert(&input("a", 120.0, 98.0)).await.unwrap();
    store.insert(&input("b", 95.0, 99.0)).await.unwrap();
    store.insert(&input("c", 150.0, 97.0)).await.unwrap();

    assert_eq!(
        ranked_names(&store).await,
        vec![
            ("c".to_string(), Some(1)),
            ("a".to_string(), Some(2)),
            ("b".to_string(), Some(3)),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn accuracy_breaks_wpm_ties(pool: PgPool) {
    let store = store(pool);
    store.insert(&input("sloppy", 100.0, 90.0)).await.unwrap();
    store.insert(&input("precise", 100.0, 99.5)).await.unwrap();

    let ranked = ranked_names(&store).await;
    assert_eq!(ranked[0], ("precise".to_string(), Some(1)));
    assert_eq!(ranked[1], ("sloppy".to_string(), Some(2)));
}

// ---------------------------------------------------------------------------
// Test: concurrent writers still produce a dense ranking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_inserts_rank_whole_roster(pool: PgPool) {
    const PLAYERS: usize = 24;
    let store = store(pool);

    let inserts = (0..PLAYERS).map(|i| {
        let store = store.clone();
        async move {
            store
                .insert(&input(&format!("p{i}"), 50.0 + i as f64, 90.0))
                .await
                .unwrap()
        }
    });
    join_all(inserts).await;

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), PLAYERS);

    let ranks: Vec<_> = listed.iter().map(|p| p.rank).collect();
    let expected: Vec<_> = (1..=PLAYERS as i32).map(Some).collect();
    assert_eq!(ranks, expected);

    // Fastest first.
    assert!(listed.windows(2).all(|pair| pair[0].wpm > pair[1].wpm));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_transaction_holds_back_other_ranking_writers(pool: PgPool) {
    let store = store(pool.clone());
    store.insert(&input("seed", 100.0, 90.0)).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO players (name, wpm, accuracy) VALUES ($1, $2, $3)")
        .bind("early")
        .bind(200.0_f64)
        .bind(90.0_f64)
        .execute(&mut *tx)
        .await
        .unwrap();

    let late = {
        let store = store.clone();
        tokio::spawn(async move { store.insert(&input("late", 150.0, 90.0)).await })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!late.is_finished(), "second writer must wait for the first to commit");

    tx.commit().await.unwrap();
    late.await.unwrap().unwrap();

    assert_eq!(
        ranked_names(&store).await,
        vec![
            ("early".to_string(), Some(1)),
            ("late".to_string(), Some(2)),
            ("seed".to_string(), Some(3)),
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: insert returns the pre-trigger row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_returns_row_with_store_assigned_fields(pool: PgPool) {
    let store = store(pool);
    let created = store.insert(&input("Ada", 80.0, 96.0)).await.unwrap();

    assert_eq!(created.name, "Ada");
    assert_eq!(created.wpm, 80.0);
    assert_eq!(created.accuracy, 96.0);
    assert!(created.rank.is_none(), "rank is assigned after the statement");

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].rank, Some(1));
}

// ---------------------------------------------------------------------------
// Test: update and delete re-rank the roster
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_reranks_roster(pool: PgPool) {
    let store = store(pool);
    let slow = store.insert(&input("slow", 60.0, 95.0)).await.unwrap();
    store.insert(&input("fast", 90.0, 95.0)).await.unwrap();

    let patch = PlayerPatch {
        wpm: Some(130.0),
        ..Default::default()
    };
    assert_eq!(store.update(slow.id, &patch).await.unwrap(), 1);

    let ranked = ranked_names(&store).await;
    assert_eq!(ranked[0], ("slow".to_string(), Some(1)));
    assert_eq!(ranked[1], ("fast".to_string(), Some(2)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn partial_update_keeps_other_fields(pool: PgPool) {
    let store = store(pool.clone());
    let player = store.insert(&input("Ada", 80.0, 96.0)).await.unwrap();

    let patch = PlayerPatch {
        name: Some("Ada L.".into()),
        ..Default::default()
    };
    store.update(player.id, &patch).await.unwrap();

    let row = PlayerRepo::find_by_id(&pool, player.id)
        .await
        .unwrap()
        .expect("player should exist");
    assert_eq!(row.name, "Ada L.");
    assert_eq!(row.wpm, 80.0);
    assert_eq!(row.accuracy, 96.0);
    assert!(row.updated_at >= row.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_closes_rank_gaps(pool: PgPool) {
    let store = store(pool);
    store.insert(&input("first", 150.0, 97.0)).await.unwrap();
    let second = store.insert(&input("second", 120.0, 98.0)).await.unwrap();
    store.insert(&input("third", 95.0, 99.0)).await.unwrap();

    assert_eq!(store.remove(second.id).await.unwrap(), 1);

    assert_eq!(
        ranked_names(&store).await,
        vec![("first".to_string(), Some(1)), ("third".to_string(), Some(2))]
    );
}

// ---------------------------------------------------------------------------
// Test: unknown ids are zero-row successes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_id_affects_zero_rows(pool: PgPool) {
    let store = store(pool);
    let missing = Uuid::new_v4();

    let patch = PlayerPatch {
        wpm: Some(10.0),
        ..Default::default()
    };
    assert_eq!(store.update(missing, &patch).await.unwrap(), 0);
    assert_eq!(store.remove(missing).await.unwrap(), 0);
    assert_eq!(store.remove(missing).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: CHECK constraints surface as Rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn constraint_violations_are_rejected(pool: PgPool) {
    let store = store(pool.clone());

    assert_matches!(
        store.insert(&input("over", 80.0, 101.0)).await,
        Err(StoreError::Rejected(_))
    );
    assert_matches!(
        store.insert(&input("neg", -1.0, 50.0)).await,
        Err(StoreError::Rejected(_))
    );
    assert_matches!(
        store.insert(&input("  ", 80.0, 50.0)).await,
        Err(StoreError::Rejected(_))
    );

    assert_eq!(PlayerRepo::count(&pool).await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: LISTEN/NOTIFY reaches subscribers through the listener
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_reach_subscribers(pool: PgPool) {
    let bus = Arc::new(ChangeBus::default());
    let store = PgPlayerStore::new(pool.clone(), Arc::clone(&bus));

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(PgChangeListener::new(pool, Arc::clone(&bus)).run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(300)).await;

    let count = Arc::new(AtomicUsize::new(0));
    let cb_count = Arc::clone(&count);
    let on_change: OnChange = Arc::new(move || {
        cb_count.fetch_add(1, Ordering::SeqCst);
    });
    let subscription = store.subscribe(on_change);

    let player = store.insert(&input("Ada", 80.0, 96.0)).await.unwrap();
    store.remove(player.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    // One INSERT and one DELETE; rank-only updates are not announced.
    assert_eq!(count.load(Ordering::SeqCst), 2);

    subscription.cancel();
    cancel.cancel();
    listener.await.unwrap();
}

// ---------------------------------------------------------------------------
// Test: listener re-subscribes after losing its connection
// ---------------------------------------------------------------------------

/// Backend pid of the connection currently sitting in `LISTEN`.
async fn listen_backend_pid(pool: &PgPool) -> i32 {
    for _ in 0..100 {
        let pid: Option<i32> = sqlx::query_scalar(
            "SELECT pid FROM pg_stat_activity \
             WHERE datname = current_database() \
               AND pid <> pg_backend_pid() \
               AND query LIKE 'LISTEN%'",
        )
        .fetch_optional(pool)
        .await
        .unwrap();
        if let Some(pid) = pid {
            return pid;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("listener never issued LISTEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listener_resyncs_once_listening_again(pool: PgPool) {
    let bus = Arc::new(ChangeBus::default());
    let mut rx = bus.subscribe();

    let cancel = CancellationToken::new();
    let listener = tokio::spawn(
        PgChangeListener::new(pool.clone(), Arc::clone(&bus)).run(cancel.clone()),
    );

    let pid = listen_backend_pid(&pool).await;
    let terminated: bool = sqlx::query_scalar("SELECT pg_terminate_backend($1)")
        .bind(pid)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(terminated);

    let change = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("no resync after reconnect")
        .unwrap();
    assert_eq!(change.op, ChangeOp::Resync);

    // LISTEN is already back in place when the resync goes out.
    let store = PgPlayerStore::new(pool, Arc::clone(&bus));
    let player = store.insert(&input("Ada", 80.0, 96.0)).await.unwrap();

    let change = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("insert not announced after reconnect")
        .unwrap();
    assert_eq!(change.op, ChangeOp::Insert);
    assert_eq!(change.player_id, Some(player.id));

    cancel.cancel();
    listener.await.unwrap();
}

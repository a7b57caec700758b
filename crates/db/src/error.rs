//! Mapping from sqlx failures to [`StoreError`].

use typeboard_core::store::StoreError;

/// PostgreSQL SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";
/// PostgreSQL SQLSTATE for `not_null_violation`.
const NOT_NULL_VIOLATION: &str = "23502";

/// Classify a sqlx error.
///
/// - CHECK / NOT NULL violations map to [`StoreError::Rejected`].
/// - Connection, TLS, and pool failures map to [`StoreError::Unavailable`].
/// - Everything else maps to [`StoreError::Query`].
pub fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(CHECK_VIOLATION) | Some(NOT_NULL_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unknown");
                StoreError::Rejected(format!("violates constraint {constraint}"))
            }
            _ => StoreError::Query(db_err.message().to_string()),
        },
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Query(err.to_string()),
    }
}

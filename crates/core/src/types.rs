/// Player primary keys are PostgreSQL UUIDs assigned by the store.
pub type PlayerId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

use crate::store::StoreError;
use crate::types::PlayerId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: PlayerId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl From<StoreError> for CoreError {
    /// Constraint rejections surface as [`CoreError::Validation`]; every other
    /// store failure surfaces as [`CoreError::Store`].
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(msg) => CoreError::Validation(msg),
            other => CoreError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn rejected_store_error_becomes_validation() {
        let err: CoreError = StoreError::Rejected("accuracy out of range".into()).into();
        assert_matches!(err, CoreError::Validation(msg) if msg == "accuracy out of range");
    }

    #[test]
    fn transport_store_error_becomes_store() {
        let err: CoreError = StoreError::Unavailable("connection refused".into()).into();
        assert_matches!(err, CoreError::Store(msg) if msg.contains("connection refused"));
    }
}

//! Error types for modelplus.
//!
//! All errors are strongly typed using thiserror so callers can match on
//! the specific failure. Reads never fail: an unresolvable attribute is
//! simply absent. Only writes and stream receives report errors.

use thiserror::Error;

use crate::store::StoreError;

/// Validation errors raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Validation rejected the proposed attributes: {reason}")]
    Rejected {
        reason: String,
    },

    #[error("Mutator name cannot be empty")]
    EmptyMutatorName,

    #[error("Invalid model configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Top-level error type for modelplus.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Mutator '{key}' failed: {reason}")]
    Mutator {
        key: String,
        reason: String,
    },

    #[error("Event stream disconnected: {path}")]
    Disconnected {
        path: String,
    },

    #[error("Operation timed out after {duration_ms}ms")]
    Timeout {
        duration_ms: u64,
    },
}

impl ModelError {
    /// Creates a mutator failure for `key`.
    #[must_use]
    pub fn mutator(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Mutator {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a mutator setter reported the failure.
    #[must_use]
    pub const fn is_mutator(&self) -> bool {
        matches!(self, Self::Mutator { .. })
    }

    /// Returns true if the underlying store refused a write.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result type alias for modelplus operations.
pub type ModelResult<T> = Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_rejected() {
        let err = ValidationError::Rejected {
            reason: "age must be positive".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("rejected"));
        assert!(msg.contains("age must be positive"));
    }

    #[test]
    fn test_mutator_error_names_key() {
        let err = ModelError::mutator("fullname", "expected a string");
        assert!(err.is_mutator());
        let msg = format!("{err}");
        assert!(msg.contains("fullname"));
        assert!(msg.contains("expected a string"));
    }

    #[test]
    fn test_model_error_from_validation() {
        let err: ModelError = ValidationError::EmptyMutatorName.into();
        assert!(err.is_validation());
        assert!(!err.is_store());
    }

    #[test]
    fn test_model_error_from_store() {
        let err: ModelError = StoreError::ReadOnly {
            key: "status".to_string(),
        }
        .into();
        assert!(err.is_store());
        assert!(format!("{err}").contains("status"));
    }

    #[test]
    fn test_timeout_message() {
        let err = ModelError::Timeout { duration_ms: 250 };
        assert!(format!("{err}").contains("250ms"));
    }
}

//! Error taxonomy for reservation operations.

use thiserror::Error;

/// Result type alias for reservation operations.
pub type Result<T> = std::result::Result<T, ReservationError>;

/// All failure modes of the reservation lifecycle and its store.
///
/// Every failure is request-scoped: none of these should abort the process.
/// An unreadable document is recovered locally by falling back to an empty
/// collection on load, so [`ReservationError::Persistence`] only surfaces on
/// the write path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Required input was missing or malformed.
    #[error("validation failed: {reason}")]
    Validation {
        /// What was wrong with the input.
        reason: String,
    },

    /// No reservation matches the given id or tracking number.
    #[error("reservation {key} not found")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The operation contradicts the current state, e.g. claiming a
    /// delivery that another driver already claimed.
    #[error("conflict: {reason}")]
    Conflict {
        /// Why the operation was rejected.
        reason: String,
    },

    /// The persisted document could not be written.
    #[error("persistence failure: {reason}")]
    Persistence {
        /// Underlying I/O or serialization failure, stringified.
        reason: String,
    },
}

impl ReservationError {
    /// Convenience constructor for validation failures.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for lookup failures.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Convenience constructor for state conflicts.
    #[must_use]
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for write failures.
    #[must_use]
    pub fn persistence(reason: impl Into<String>) -> Self {
        Self::Persistence {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_key() {
        let err = ReservationError::not_found("R123456");
        assert_eq!(err.to_string(), "reservation R123456 not found");
    }

    #[test]
    fn display_includes_reason() {
        let err = ReservationError::validation("itemDescription required");
        assert_eq!(
            err.to_string(),
            "validation failed: itemDescription required"
        );
    }
}

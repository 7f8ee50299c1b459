//! Error types for query building.

use entipersist_core::PersistError;
use thiserror::Error;

/// Result type for query building.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while lowering conditions into query fragments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The builder cannot express this predicate.
    #[error("{builder} does not support the \"{predicate}\" predicate")]
    UnsupportedPredicate {
        /// Predicate kind, e.g. `equals-as-time`.
        predicate: String,
        /// Builder that rejected it.
        builder: String,
    },

    /// Metadata error such as an unknown property.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl QueryError {
    /// Creates an unsupported predicate error.
    pub fn unsupported_predicate(predicate: impl Into<String>, builder: impl Into<String>) -> Self {
        Self::UnsupportedPredicate {
            predicate: predicate.into(),
            builder: builder.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_property_passes_through() {
        let err: QueryError = PersistError::unknown_property("users", "nickname").into();
        assert_eq!(
            err.to_string(),
            "unknown property \"nickname\" in table \"users\""
        );
    }

    #[test]
    fn unsupported_predicate_message() {
        let err = QueryError::unsupported_predicate("before-as-time", "MyBuilder");
        assert_eq!(
            err.to_string(),
            "MyBuilder does not support the \"before-as-time\" predicate"
        );
    }
}

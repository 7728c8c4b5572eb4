//! # Query Errors
//!
//! Error types for query composition and inspection.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required argument was absent or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = QueryError::InvalidArgument("query must not be absent");
        assert_eq!(err.to_string(), "Invalid argument: query must not be absent");
    }
}

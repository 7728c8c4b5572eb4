//! # Data Layer Errors
//!
//! Error codes:
//! - ITEMSVC_STORE_IO_ERROR
//! - ITEMSVC_STORE_CORRUPTION
//! - ITEMSVC_STORE_ALREADY_EXISTS
//! - ITEMSVC_STORE_LOCK_POISONED
//! - ITEMSVC_ENTITY_NOT_FOUND
//! - ITEMSVC_ENTITY_DECODE_FAILED
//! - ITEMSVC_INVALID_ARGUMENT

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::query::QueryError;

pub type StoreResult<T> = Result<T, StoreError>;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Data file failed checksum or could not be decoded
    #[error("Data file corrupted: {0}")]
    Corruption(String),

    #[error("Data file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "ITEMSVC_STORE_IO_ERROR",
            StoreError::Corruption(_) => "ITEMSVC_STORE_CORRUPTION",
            StoreError::AlreadyExists(_) => "ITEMSVC_STORE_ALREADY_EXISTS",
            StoreError::LockPoisoned => "ITEMSVC_STORE_LOCK_POISONED",
        }
    }

    /// Corruption must stop the process; other errors fail one operation
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Corruption(_))
    }
}

/// Errors raised by repositories and paging
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: i64 },

    #[error("Failed to decode {collection} record: {message}")]
    Decode {
        collection: &'static str,
        message: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl RepositoryError {
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::Store(e) => e.code(),
            RepositoryError::NotFound { .. } => "ITEMSVC_ENTITY_NOT_FOUND",
            RepositoryError::Decode { .. } => "ITEMSVC_ENTITY_DECODE_FAILED",
            RepositoryError::InvalidArgument(_) => "ITEMSVC_INVALID_ARGUMENT",
        }
    }
}

impl From<QueryError> for RepositoryError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidArgument(msg) => RepositoryError::InvalidArgument(msg.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(StoreError::LockPoisoned.code(), "ITEMSVC_STORE_LOCK_POISONED");
        let err = RepositoryError::from(StoreError::Corruption("bad".into()));
        assert_eq!(err.code(), "ITEMSVC_STORE_CORRUPTION");
        assert!(StoreError::Corruption("bad".into()).is_fatal());
    }

    #[test]
    fn test_query_error_conversion() {
        let err = RepositoryError::from(QueryError::InvalidArgument("query must not be absent"));
        assert!(matches!(err, RepositoryError::InvalidArgument(ref m) if m == "query must not be absent"));
    }

    #[test]
    fn test_not_found_display() {
        let err = RepositoryError::NotFound {
            collection: "items",
            id: 9,
        };
        assert_eq!(err.to_string(), "items record 9 not found");
    }
}

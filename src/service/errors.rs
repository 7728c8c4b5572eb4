//! # Service Errors

use thiserror::Error;

use crate::data::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed request content
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Item {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { id, .. } => ServiceError::NotFound(id),
            RepositoryError::InvalidArgument(msg) => ServiceError::InvalidArgument(msg),
            other => ServiceError::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_maps() {
        let err = ServiceError::from(RepositoryError::NotFound {
            collection: "items",
            id: 3,
        });
        assert!(matches!(err, ServiceError::NotFound(3)));
    }

    #[test]
    fn test_invalid_argument_maps() {
        let err = ServiceError::from(RepositoryError::InvalidArgument("bad".into()));
        assert_eq!(err.to_string(), "bad");
    }
}

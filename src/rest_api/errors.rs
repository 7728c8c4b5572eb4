//! # REST API Errors
//!
//! Error types for the HTTP layer and their status code mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::service::ServiceError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query string
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Invalid request body
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Request content failed validation
    #[error("{0}")]
    InvalidArgument(String),

    /// Malformed `x-user-id` header
    #[error("Invalid user id header: {0}")]
    InvalidUserId(String),

    /// Caller may not edit items
    #[error("Edit permission required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_)
            | RestError::InvalidBody(_)
            | RestError::InvalidArgument(_)
            | RestError::InvalidUserId(_) => StatusCode::BAD_REQUEST,
            RestError::Forbidden => StatusCode::FORBIDDEN,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for RestError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(msg) => RestError::InvalidArgument(msg),
            ServiceError::NotFound(_) => RestError::NotFound(err.to_string()),
            ServiceError::Repository(inner) => {
                Logger::error(
                    "REPOSITORY_FAILURE",
                    &[("code", inner.code()), ("error", &inner.to_string())],
                );
                RestError::Internal(inner.to_string())
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_client_error() {
            log_event_with_fields(
                Event::RequestRejected,
                &[("status", status.as_str()), ("error", &self.to_string())],
            );
        }
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RepositoryError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            RestError::InvalidQueryParam("page".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RestError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            RestError::NotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RestError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let err = RestError::from(ServiceError::NotFound(4));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Item 4 not found");

        let err = RestError::from(ServiceError::InvalidArgument("Item name is required".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = RestError::from(ServiceError::Repository(RepositoryError::Store(
            crate::data::StoreError::LockPoisoned,
        )));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_body() {
        let body = ErrorResponse::from(RestError::Forbidden);
        assert_eq!(body.code, 403);
        assert_eq!(body.error, "Edit permission required");
    }
}

//! Unified error types for the todo service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::TodoId;

/// Startup and configuration errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store errors. Absence is the only failure the store reports.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// No todo with this identifier.
    #[error("todo {id} not found")]
    NotFound {
        /// The missing identifier.
        id: TodoId,
    },
}

/// Request-level errors, rendered as plain-text responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Identifier absent from the store.
    #[error("Todo not found")]
    NotFound,

    /// Malformed body, non-integer identifier, or empty title.
    #[error("{0}")]
    InvalidInput(String),

    /// Verb not supported for the matched path.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    /// Identifier segment did not parse.
    pub fn invalid_id() -> Self {
        Self::InvalidInput("Invalid ID".to_string())
    }

    /// Body is not a decodable todo payload.
    pub fn invalid_body() -> Self {
        Self::InvalidInput("Invalid request body".to_string())
    }

    /// Create payload carried no title.
    pub fn title_required() -> Self {
        Self::InvalidInput("Title is required".to_string())
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), format!("{self}\n")).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_status_codes() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::invalid_id().status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::title_required().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn store_not_found_becomes_api_not_found() {
        let err: ApiError = StoreError::NotFound { id: 3 }.into();
        assert_eq!(err, ApiError::NotFound);
    }

    #[test]
    fn messages_match_wire_text() {
        assert_eq!(ApiError::invalid_body().to_string(), "Invalid request body");
        assert_eq!(ApiError::MethodNotAllowed.to_string(), "Method not allowed");
        assert_eq!(StoreError::NotFound { id: 9 }.to_string(), "todo 9 not found");
    }
}

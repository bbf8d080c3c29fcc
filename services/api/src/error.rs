//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::models::MessageResponse;
use thiserror::Error;
use tracing::error;

use crate::repositories::StoreError;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input clashes with existing state, e.g. a duplicate email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No session cookie was presented
    #[error("Not logged in")]
    Unauthenticated,

    /// Session cookie is expired or carries a bad signature
    #[error("Invalid session")]
    Forbidden,

    /// Missing user or missing linked resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// External catalog call failed; the message never carries upstream detail
    #[error("Upstream unavailable: {0}")]
    Upstream(&'static str),

    /// External catalog answered with an error status that is relayed as-is
    #[error("Upstream responded with {status}")]
    UpstreamStatus {
        status: StatusCode,
        message: Option<String>,
    },

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) | ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not logged in".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Invalid session".to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
            ApiError::UpstreamStatus { status, message } => (
                status,
                message.unwrap_or_else(|| "Server error".to_string()),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server error".to_string(),
            ),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => {
                ApiError::Conflict("User with this email already exists.".to_string())
            }
            StoreError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            StoreError::Database(e) => {
                error!("Credential store failure: {}", e);
                ApiError::Internal
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

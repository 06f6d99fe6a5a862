//! Error handling for the backend API

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use study_core::SessionError;
use thiserror::Error;

use crate::repository::RepositoryError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No cards match the selected filters; broaden your filters and try again")]
    EmptyResult,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Card repository unavailable: {0}")]
    Upstream(#[from] RepositoryError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match &err {
            SessionError::EmptyResult => ApiError::EmptyResult,
            SessionError::InvalidConfig(message) => ApiError::InvalidConfig(message.clone()),
            SessionError::UnknownCard(_) => ApiError::NotFound(err.to_string()),
            SessionError::NotReached(_) | SessionError::NotRevealed(_) | SessionError::Completed => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

/// Session config bodies that fail to deserialize (e.g. a negative
/// `card_count`) are config errors, not generic extractor failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidConfig(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::EmptyResult => (StatusCode::UNPROCESSABLE_ENTITY, "empty_result"),
            ApiError::InvalidConfig(_) => (StatusCode::BAD_REQUEST, "invalid_config"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

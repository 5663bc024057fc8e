//! HTTP error responses.
//!
//! Maps crate errors onto status codes and the two JSON error shapes the API
//! uses: `{"errors": [...]}` for rejected input and `{"error": "..."}` for
//! everything else.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::Error;

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// A failed request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body or one of its fields was rejected (400).
    #[error("{}", .0.join("; "))]
    Invalid(Vec<String>),

    /// A record or reference does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Storage or another internal failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_validation() {
            Self::Invalid(
                err.validation_errors()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
        } else if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Invalid(vec![rejection.body_text()])
    }
}

/// `{"errors": [...]}`
#[derive(Debug, Serialize)]
struct ErrorsBody {
    errors: Vec<String>,
}

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            Self::Invalid(errors) => {
                warn!("Rejected request: {}", errors.join("; "));
                (status, Json(ErrorsBody { errors })).into_response()
            }
            Self::NotFound(error) => (status, Json(ErrorBody { error })).into_response(),
            Self::Internal(detail) => {
                error!("Request failed: {}", detail);
                let error = "Internal server error".to_string();
                (status, Json(ErrorBody { error })).into_response()
            }
        }
    }
}

//! Error responses.
//!
//! # Responsibilities
//! - Map domain failures to status codes
//! - Turn escaped failures (errors and panics) into a generic 500
//! - Attach [`UnhandledError`] so the error hook can observe it
//!
//! # Design Decisions
//! - Bodies are `{"error": "..."}`; 500 bodies never leak internals
//! - The `X-Request-ID` header lets callers match a generic 500 to the logs

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::observability::UnhandledError;
use crate::users::{CommandError, RepositoryError};

const INTERNAL_ERROR_BODY: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Unhandled(#[from] UnhandledError),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::Unhandled(UnhandledError::from_error(&err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Invalid(_) => ApiError::BadRequest(err.to_string()),
            CommandError::NotFound => ApiError::NotFound(err.to_string()),
            CommandError::EmailTaken => ApiError::Conflict(err.to_string()),
            CommandError::Repository(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.as_str()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.as_str()),
            ApiError::Unhandled(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY),
        };

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if let ApiError::Unhandled(err) = self {
            response.extensions_mut().insert(err);
        }
        response
    }
}

/// Response for a panic caught in handler code.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::Unhandled(UnhandledError::from_panic(payload.as_ref())).into_response()
}

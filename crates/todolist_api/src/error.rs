//! HTTP error type bridging domain errors to responses.
//!
//! # Responsibility
//! - Map typed service errors to status codes (400/404/500).
//! - Render every failure as a `{"error": "..."}` JSON body.
//!
//! # Invariants
//! - 5xx responses carry a generic message; the cause is logged, never sent.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use todolist_core::TodoServiceError;

/// Message returned for unknown todo ids.
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// Application error returned by handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause, logged for server errors only.
    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a service error, using `failure_message` for the generic 500 case.
    pub fn from_service(err: TodoServiceError, failure_message: &str) -> Self {
        match err {
            TodoServiceError::Validation(validation) => Self::bad_request(validation.to_string()),
            TodoServiceError::NotFound(_) => Self::not_found(),
            TodoServiceError::Repo(repo) => Self::internal(failure_message).with_source(repo),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::unsupported_media_type("Content-Type must be application/json")
            }
            other => Self::bad_request(format!("Invalid request body: {}", other.body_text())),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => error!(
                    "event=http_error module=api status=error http_status={} message={} error={}",
                    self.status.as_u16(),
                    self.message,
                    source
                ),
                None => error!(
                    "event=http_error module=api status=error http_status={} message={}",
                    self.status.as_u16(),
                    self.message
                ),
            }
        }

        let body = ErrorBody {
            error: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing or empty
    Validation,
    /// Storage, LLM or pipeline call failed
    Upstream,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Upstream => "upstream",
        };
        f.write_str(name)
    }
}

/// Error returned by HTTP handlers.
///
/// `detail` is what goes into the logs. The HTTP body carries `message`,
/// which for upstream failures wraps the detail text.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub detail: String,
    message: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: ErrorKind::Validation,
            detail: message.clone(),
            message,
        }
    }

    /// Upstream failure whose public message is `"{context}: {detail}"`.
    pub fn upstream(context: &str, detail: impl fmt::Display) -> Self {
        let detail = detail.to_string();
        Self {
            kind: ErrorKind::Upstream,
            message: format!("{}: {}", context, detail),
            detail,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text rendered into the `error` field of the response body
    pub fn public_message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::Validation => tracing::debug!("Rejected request: {}", self.detail),
            ErrorKind::Upstream => tracing::error!("{}", self),
        }
        (self.status(), Json(json!({ "error": self.message }))).into_response()
    }
}

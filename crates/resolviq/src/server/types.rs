//! Request forms and JSON response bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Form body for `POST /add_step`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StepForm {
    /// Command or action taken.
    pub command: String,
    /// Output or result observed.
    pub output: String,
    /// Analyst's interpretation.
    pub analysis: String,
}

/// JSON envelope returned by every session endpoint.
///
/// `success` is always present; the other fields appear only when set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    /// Whether the operation took effect.
    pub success: bool,
    /// Why it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Session snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The step just recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<Value>,
    /// Human-readable confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where to fetch the RCA document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl ApiResponse {
    /// Bare `{"success": ...}`.
    #[must_use]
    pub fn status(success: bool) -> Self {
        Self {
            success,
            ..Self::default()
        }
    }

    /// `{"success": false, "error": ...}`.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::status(false)
        }
    }

    /// `{"success": true, "data": ...}`.
    #[must_use]
    pub fn data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::status(true)
        }
    }
}

/// Body of the JSON 404 fallback.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Failures the HTTP layer answers with a JSON [`ErrorResponse`] and a
/// matching status code instead of an [`ApiResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be decoded (bad path parameter, wrong content
    /// type, malformed form).
    BadRequest,
    /// No route matches.
    NotFound,
    /// A handler panicked.
    Internal,
}

impl ApiError {
    /// HTTP status for this failure.
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the `error` field.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::NotFound => "Not found",
            Self::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

//! Route handlers.
//!
//! Each handler resolves the session from the request cookie, calls one store
//! operation, and wraps the result in an [`ApiResponse`]. An unknown or
//! missing session is an ordinary `"success": false` answer, not an HTTP
//! error.

use std::any::Any;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Local;
use tracing::{error, warn};

use crate::record::{IssueInfo, Resolution};
use crate::report::rca_filename;
use crate::server::extract::{Form, Path};
use crate::server::types::{ApiError, ApiResponse, StepForm};
use crate::server::AppState;

const NO_SESSION: &str = "No session found";

/// Pull the session id out of the cookie or answer with "No session found".
fn session_id(state: &AppState, headers: &HeaderMap) -> Result<String, Json<ApiResponse>> {
    state
        .cookie
        .read(headers)
        .ok_or_else(|| Json(ApiResponse::failure(NO_SESSION)))
}

/// GET /: Resolve the caller's session, creating one if the cookie is
/// missing or no longer matches a stored session.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let session = state
        .cookie
        .read(&headers)
        .and_then(|id| state.store.get_session(&id))
        .unwrap_or_else(|| state.store.create_session());

    (
        [(header::SET_COOKIE, state.cookie.set(&session.session_id))],
        Json(ApiResponse::data(session.to_value())),
    )
}

/// POST /update_issue: Replace the issue description.
pub async fn update_issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(issue): Form<IssueInfo>,
) -> Json<ApiResponse> {
    match session_id(&state, &headers) {
        Ok(id) => Json(ApiResponse::status(state.store.update_issue_info(&id, issue))),
        Err(response) => response,
    }
}

/// POST /add_step: Record a diagnostic step.
pub async fn add_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<StepForm>,
) -> Json<ApiResponse> {
    let id = match session_id(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state
        .store
        .add_step(&id, &form.command, &form.output, &form.analysis)
    {
        Some(step) => Json(ApiResponse {
            step: Some(step.to_value()),
            ..ApiResponse::status(true)
        }),
        None => Json(ApiResponse::failure("Command or output required")),
    }
}

/// POST /remove_step/{step_id}: Remove a step by its id.
pub async fn remove_step(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(step_id): Path<u32>,
) -> Json<ApiResponse> {
    match session_id(&state, &headers) {
        Ok(id) => Json(ApiResponse::status(state.store.remove_step(&id, step_id))),
        Err(response) => response,
    }
}

/// POST /update_resolution: Replace the resolution summary.
pub async fn update_resolution(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(resolution): Form<Resolution>,
) -> Json<ApiResponse> {
    match session_id(&state, &headers) {
        Ok(id) => Json(ApiResponse::status(
            state.store.update_resolution(&id, resolution),
        )),
        Err(response) => response,
    }
}

/// GET /generate_report: The Markdown report as `text/markdown`.
pub async fn generate_report(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let id = match session_id(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response.into_response(),
    };

    match state.store.generate_report(&id) {
        Some(report) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            report,
        )
            .into_response(),
        None => Json(ApiResponse::failure("Failed to generate report")).into_response(),
    }
}

/// POST /reset_session: Drop the session and start over at `/`.
pub async fn reset_session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = state.cookie.read(&headers) {
        state.store.reset_session(&id);
    }

    (
        [(header::SET_COOKIE, state.cookie.clear())],
        Redirect::to("/"),
    )
}

/// GET /api/session_data: Snapshot of the caller's session.
pub async fn session_data(State(state): State<AppState>, headers: HeaderMap) -> Json<ApiResponse> {
    let id = match session_id(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.get_session(&id) {
        Some(session) => Json(ApiResponse::data(session.to_value())),
        None => Json(ApiResponse::failure("Session not found")),
    }
}

/// POST /complete_rca: Mark the RCA complete and point at the download.
pub async fn complete_rca(State(state): State<AppState>, headers: HeaderMap) -> Json<ApiResponse> {
    let id = match session_id(&state, &headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.generate_rca_report(&id) {
        Some(_) => Json(ApiResponse {
            message: Some("RCA completed successfully".to_string()),
            download_url: Some(format!("/download_rca/{id}")),
            ..ApiResponse::status(true)
        }),
        None => Json(ApiResponse::failure("Failed to generate RCA report")),
    }
}

/// GET /download_rca/{session_id}: The RCA document as a text attachment.
///
/// Downloading does not re-stamp the completion time.
pub async fn download_rca(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session) = state.store.get_session(&session_id) else {
        return Json(ApiResponse::failure("Session not found")).into_response();
    };
    let Some(document) = state.store.generate_rca_document(&session_id) else {
        return Json(ApiResponse::failure("Failed to generate RCA document")).into_response();
    };

    let filename = rca_filename(&session.issue_info.title, &Local::now());
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, attachment(&filename)),
        ],
        document,
    )
        .into_response()
}

/// `Content-Disposition` for `filename`, degrading to a bare `attachment`
/// when the title holds characters a header cannot carry.
fn attachment(filename: &str) -> HeaderValue {
    let quoted = filename.replace(['"', '\\'], "_");
    HeaderValue::from_str(&format!("attachment; filename=\"{quoted}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// GET /health: Liveness check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    warn!("404 error: {uri}");
    ApiError::NotFound
}

/// Turn a handler panic into a JSON 500. Used by the `CatchPanicLayer`.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload");
    error!("Unhandled exception: {detail}");
    ApiError::Internal.into_response()
}

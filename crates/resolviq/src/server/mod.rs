//! HTTP front end for the session store.
//!
//! Sessions are tied to browsers by a cookie holding the session id. Form
//! posts map one-to-one onto [`SessionStore`] operations; see [`handlers`]
//! for the individual routes. Undecodable requests, unknown routes and
//! handler panics all answer with a JSON `{"error": ...}` body.

pub mod cookie;
pub mod extract;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::SessionStore;
pub use cookie::SessionCookie;

/// Shared state for route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide session store.
    pub store: Arc<SessionStore>,
    /// Session cookie settings.
    pub cookie: SessionCookie,
}

impl AppState {
    /// Build state around `store` using the configured cookie settings.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, config: &Config) -> Self {
        Self {
            store,
            cookie: SessionCookie::from_config(config),
        }
    }
}

/// Build the axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/update_issue", post(handlers::update_issue))
        .route("/add_step", post(handlers::add_step))
        .route("/remove_step/{step_id}", post(handlers::remove_step))
        .route("/update_resolution", post(handlers::update_resolution))
        .route("/generate_report", get(handlers::generate_report))
        .route("/reset_session", post(handlers::reset_session))
        .route("/api/session_data", get(handlers::session_data))
        .route("/complete_rca", post(handlers::complete_rca))
        .route("/download_rca/{session_id}", get(handlers::download_rca))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid, the listener cannot be bound,
/// or the server fails while running.
pub async fn serve(config: &Config, store: Arc<SessionStore>) -> Result<()> {
    let addr = config.bind_address()?;
    let router = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })?;
    info!("ResolvIQ listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ResolvIQ stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

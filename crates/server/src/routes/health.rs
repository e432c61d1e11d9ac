//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::error::Result;
use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Pings the record store, returning 503 Service Unavailable if it is not
/// reachable.
///
/// # Errors
///
/// Returns `AppError::Unavailable` when the ping fails.
pub async fn readiness(State(state): State<AppState>) -> Result<StatusCode> {
    state.store().ping().await?;
    Ok(StatusCode::OK)
}

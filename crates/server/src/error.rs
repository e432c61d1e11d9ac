//! HTTP-edge error handling with Sentry integration.
//!
//! GraphQL failures travel inside the GraphQL response (see
//! `graphql::error`); `AppError` covers everything answered with a plain HTTP
//! status, such as rejected tokens or failed readiness probes.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for plain HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or invalid API token.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The record store is unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Unavailable(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let status = match &self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Unauthorized(_) => "Unauthorized".to_string(),
            Self::Unavailable(_) => "Service unavailable".to_string(),
            Self::NotFound(_) => self.to_string(),
        };

        if matches!(self, Self::Unauthorized(_)) {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], message).into_response();
        }
        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the token subject.
///
/// Call this after successful authentication to associate errors with callers.
pub fn set_sentry_user(subject: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(subject.to_string()),
            ..Default::default()
        }));
    });
}

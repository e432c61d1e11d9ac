//! HTTP routes for the roster API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check
//! GET  /health/ready  - Record store ping
//! POST /graphql       - GraphQL endpoint (bearer token required)
//! GET  /graphql       - GraphiQL IDE (when ROSTER_GRAPHIQL=true)
//! ```

pub mod graphql;
pub mod health;

use axum::{
    Router,
    body::Body,
    http::Request,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create all routes with the middleware stack applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/graphql", get(graphql::graphiql).post(graphql::execute))
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                subject = tracing::field::Empty,
            )
        }))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

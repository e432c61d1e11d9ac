//! HTTP middleware for the roster API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request span with `request_id` and `subject` fields)
//! 3. Request ID (add unique ID to each request)
//!
//! Token checks are an extractor ([`RequireToken`]) on the GraphQL handler
//! rather than a layer, so health probes and GraphiQL stay open.

pub mod auth;
pub mod request_id;

pub use auth::RequireToken;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

//! Bearer token authentication extractor.
//!
//! Every GraphQL request must carry `Authorization: Bearer <token>` signed
//! with the configured secret.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;
use tracing::Span;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{AuthError, TokenClaims};
use crate::state::AppState;

/// Extractor that requires a valid API token.
///
/// Rejects with `401 Unauthorized` if the token is missing, malformed,
/// forged, or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireToken(claims): RequireToken,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", claims.subject)
/// }
/// ```
pub struct RequireToken(pub TokenClaims);

impl FromRequestParts<AppState> for RequireToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;
        let claims = state.signer().verify(token, Utc::now())?;

        Span::current().record("subject", claims.subject.as_str());
        set_sentry_user(&claims.subject);

        Ok(Self(claims))
    }
}

/// The token from an `Authorization: Bearer` header, if present.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

//! GraphQL endpoint and the GraphiQL page.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::RequireToken;
use crate::state::AppState;

/// Execute a GraphQL request for an authenticated caller.
#[instrument(skip_all, fields(subject = %claims.subject))]
pub async fn execute(
    State(state): State<AppState>,
    RequireToken(claims): RequireToken,
    request: GraphQLRequest,
) -> GraphQLResponse {
    state
        .schema()
        .execute(request.into_inner())
        .await
        .into()
}

/// Serve the GraphiQL IDE when enabled.
///
/// # Errors
///
/// Returns `AppError::NotFound` when GraphiQL is disabled.
pub async fn graphiql(State(state): State<AppState>) -> Result<Html<String>> {
    if !state.graphiql_enabled() {
        return Err(AppError::NotFound("/graphql".to_string()));
    }
    Ok(Html(GraphiQLSource::build().endpoint("/graphql").finish()))
}

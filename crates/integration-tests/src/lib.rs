//! Integration tests for Gym Roster.
//!
//! # Running Tests
//!
//! ```bash
//! # Router-level tests (in-memory store, no server needed)
//! cargo test -p gym-roster-integration-tests
//!
//! # Live-server tests
//! ROSTER_STORE=memory ROSTER_SEED_SAMPLE=true cargo run -p gym-roster-server &
//! ROSTER_TEST_TOKEN=$(roster-cli token issue -s tests) \
//!     cargo test -p gym-roster-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api_router` - Full axum router driven with `tower::ServiceExt::oneshot`
//! - `live_server` - HTTP against a running server via `reqwest`

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use gym_roster_core::UniquenessPolicy;
use gym_roster_server::db::MemoryRecordStore;
use gym_roster_server::routes;
use gym_roster_server::services::FixedClock;
use gym_roster_server::services::auth::TokenSigner;
use gym_roster_server::state::AppState;

/// Signing secret used by every router test.
pub const TEST_SECRET: &str = "Q7v$Lm2#Xp9@Rt4!Kw8^Zb1&Nc6*Hd3%";

/// The date the test clock is stopped on.
#[must_use]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default()
}

/// A router over a fresh in-memory store, plus a valid token for it.
pub struct TestApp {
    pub router: Router,
    pub token: String,
    pub signer: TokenSigner,
}

impl TestApp {
    /// Build an app with the given uniqueness policy and GraphiQL setting.
    ///
    /// # Panics
    ///
    /// Panics if the test token cannot be issued.
    #[must_use]
    pub fn with(policy: UniquenessPolicy, graphiql: bool) -> Self {
        let signer = TokenSigner::new(SecretString::from(TEST_SECRET.to_owned()));
        let token = signer
            .issue("tests", Duration::hours(1), Utc::now())
            .expect("test token");

        let state = AppState::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(FixedClock(test_today())),
            policy,
            signer.clone(),
            graphiql,
        );

        Self {
            router: routes::router(state),
            token,
            signer,
        }
    }

    /// Build an app with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with(UniquenessPolicy::Any, false)
    }

    /// Issue a token that expired an hour before `now`.
    ///
    /// # Panics
    ///
    /// Panics if the token cannot be issued.
    #[must_use]
    pub fn expired_token(&self, now: DateTime<Utc>) -> String {
        self.signer
            .issue("tests", Duration::hours(-1), now)
            .expect("expired token")
    }

    /// Send a raw request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the router fails to respond.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("response body");
        (status, headers, body.to_vec())
    }

    /// Run a GraphQL operation with the app's token, returning the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the response is not a 200 with a JSON body.
    pub async fn graphql(&self, query: &str, variables: Value) -> Value {
        let request = graphql_request(Some(&self.token), query, &variables);
        let (status, _, body) = self.send(request).await;
        assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
        serde_json::from_slice(&body).expect("JSON body")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a `POST /graphql` request.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
pub fn graphql_request(token: Option<&str>, query: &str, variables: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = json!({ "query": query, "variables": variables });
    builder
        .body(Body::from(body.to_string()))
        .expect("graphql request")
}

/// The `extensions.code` values from a GraphQL response.
#[must_use]
pub fn error_codes(response: &Value) -> Vec<String> {
    response["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["extensions"]["code"].as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

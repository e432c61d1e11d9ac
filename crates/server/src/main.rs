//! Gym Roster server - GraphQL API for gym clients and membership products.
//!
//! This binary serves the API on port 5000 by default.
//!
//! # Architecture
//!
//! - Axum web framework with async-graphql
//! - `PostgreSQL` record store, or an in-memory store for demos
//! - HMAC-signed bearer tokens guarding `POST /graphql`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

use gym_roster_server::config::{LogFormat, RosterConfig, StoreConfig};
use gym_roster_server::db::{self, MemoryRecordStore, PgRecordStore, RecordStore};
use gym_roster_server::routes;
use gym_roster_server::seed::{self, SeedData};
use gym_roster_server::services::SystemClock;
use gym_roster_server::services::auth::TokenSigner;
use gym_roster_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &RosterConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gym_roster_server=info,tower_http=debug".into());

    let fmt_layer = match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

/// Open the configured record store, seeding the memory store if asked.
async fn open_store(config: &RosterConfig) -> Arc<dyn RecordStore> {
    match &config.store {
        StoreConfig::Postgres { database_url } => {
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            // NOTE: Migrations are NOT run automatically on startup.
            // Run them explicitly via: cargo run -p gym-roster-cli -- migrate
            Arc::new(PgRecordStore::new(pool))
        }
        StoreConfig::Memory { .. } => {
            tracing::warn!("Using in-memory record store; data is lost on exit");
            Arc::new(MemoryRecordStore::new())
        }
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = RosterConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let store = open_store(&config).await;
    let state = AppState::new(
        store,
        Arc::new(SystemClock),
        config.uniqueness,
        TokenSigner::new(config.token_secret.clone()),
        config.graphiql,
    );
    tracing::info!(policy = %config.uniqueness, "Uniqueness policy");

    if matches!(config.store, StoreConfig::Memory { seed_sample: true }) {
        let data = SeedData::sample().expect("Bundled sample data is invalid");
        seed::seed(data, state.clients(), state.products())
            .await
            .expect("Failed to seed sample data");
    }

    let app = routes::router(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("gym-roster listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

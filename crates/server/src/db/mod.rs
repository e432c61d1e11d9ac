//! Record store for clients and products.
//!
//! # Backends
//!
//! - [`PgRecordStore`] - `PostgreSQL` tables `roster.client` and `roster.product`
//! - [`MemoryRecordStore`] - process-local maps, used for demos and tests
//!
//! Both are shared behind `Arc<dyn RecordStore>`, created once at startup and
//! used concurrently by every request without further locking at this layer.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p gym-roster-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use gym_roster_core::{Client, ClientFilter, ClientId, Product, ProductId};

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage operations over the client and product collections.
///
/// Lookups return `Ok(None)` for absent records; update and delete return the
/// affected record, or `None` when nothing had that id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All clients.
    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;

    /// Find a client by identity.
    async fn find_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;

    /// Find the first client matching `filter`.
    async fn find_client_by(&self, filter: &ClientFilter)
    -> Result<Option<Client>, RepositoryError>;

    /// Insert a new client record.
    async fn insert_client(&self, client: &Client) -> Result<(), RepositoryError>;

    /// Replace the client with the same identity.
    async fn update_client(&self, client: &Client) -> Result<Option<Client>, RepositoryError>;

    /// Remove a client, returning the removed record.
    async fn delete_client(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;

    /// All products.
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Find a product by identity.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a new product record.
    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;

    /// Replace the product with the same identity.
    async fn update_product(&self, product: &Product) -> Result<Option<Product>, RepositoryError>;

    /// Remove a product, returning the removed record.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

//! Seed the `PostgreSQL` store with clients and products.
//!
//! Records go through the same services as API writes, so ages and
//! membership statuses are derived and duplicates are skipped rather than
//! inserted.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use gym_roster_core::UniquenessPolicy;
use gym_roster_server::config::database_url_from_env;
use gym_roster_server::db::{self, PgRecordStore, RecordStore};
use gym_roster_server::seed::{self, SeedData};
use gym_roster_server::services::{ClientService, ProductService, SystemClock};

/// Seed from `file`, or from the bundled sample when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or a client references an unknown product.
pub async fn run(
    file: Option<&Path>,
    uniqueness: UniquenessPolicy,
) -> Result<(), Box<dyn std::error::Error>> {
    // Read and validate YAML before connecting to database
    let data = match file {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            info!(path = %path.display(), "Loading seed data from file");
            SeedData::from_yaml(&tokio::fs::read_to_string(path).await?)?
        }
        None => {
            info!("Loading bundled sample data");
            SeedData::sample()?
        }
    };
    info!(
        products = data.products.len(),
        clients = data.clients.len(),
        "Parsed seed data"
    );

    let database_url = database_url_from_env()?;
    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store: Arc<dyn RecordStore> = Arc::new(PgRecordStore::new(pool));
    let clients = ClientService::new(Arc::clone(&store), Arc::new(SystemClock), uniqueness);
    let products = ProductService::new(store);

    let report = seed::seed(data, &clients, &products).await?;

    // Print summary
    info!("Seeding complete!");
    info!("  Products created: {}", report.products_created);
    info!("  Products reused (already exist): {}", report.products_reused);
    info!("  Clients created: {}", report.clients_created);
    info!("  Clients skipped (already exist): {}", report.clients_skipped);

    if !report.errors.is_empty() {
        error!("  Rejected clients: {}", report.errors.len());
        for (client, err) in &report.errors {
            error!("    - {client}: {err}");
        }
        return Err(format!("{} clients rejected", report.errors.len()).into());
    }

    Ok(())
}

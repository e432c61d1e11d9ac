//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! roster-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ROSTER_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/server/migrations/` and are embedded at build
//! time:
//! ```text
//! migrations/
//! ├── 20260301000001_create_products.sql
//! └── 20260301000002_create_clients.sql
//! ```

use tracing::info;

use gym_roster_server::config::database_url_from_env;
use gym_roster_server::db;

/// Run the server's database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url_from_env()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}

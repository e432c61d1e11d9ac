//! Gym Roster CLI - Database migrations, seeding, schema export, and tokens.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! roster-cli migrate
//!
//! # Load the bundled sample dataset (or a custom file)
//! roster-cli seed
//! roster-cli seed --file path/to/roster.yaml
//!
//! # Print the GraphQL schema
//! roster-cli schema > schema.graphql
//!
//! # Issue an API token valid for 30 days
//! roster-cli token issue --subject front-desk --ttl-hours 720
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gym_roster_core::UniquenessPolicy;

mod commands;

#[derive(Parser)]
#[command(name = "roster-cli")]
#[command(author, version, about = "Gym Roster CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed clients and products through the mutation services
    Seed {
        /// YAML dataset (defaults to the bundled sample)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Uniqueness rule applied while seeding (`any` or `all`)
        #[arg(long, env = "ROSTER_UNIQUENESS", default_value = "any")]
        uniqueness: UniquenessPolicy,
    },
    /// Print the GraphQL schema in SDL form
    Schema,
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a signed API token
    Issue {
        /// Who the token is for
        #[arg(short, long)]
        subject: String,

        /// Hours until the token expires
        #[arg(long, default_value_t = 24)]
        ttl_hours: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, uniqueness } => {
            commands::seed::run(file.as_deref(), uniqueness).await?;
        }
        Commands::Schema => commands::schema::print(),
        Commands::Token { action } => match action {
            TokenAction::Issue { subject, ttl_hours } => {
                commands::token::issue(&subject, ttl_hours)?;
            }
        },
    }
    Ok(())
}

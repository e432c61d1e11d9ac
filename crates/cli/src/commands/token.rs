//! API token issuing.
//!
//! # Environment Variables
//!
//! - `ROSTER_TOKEN_SECRET` - The server's signing secret

use chrono::{Duration, Utc};
use tracing::info;

use gym_roster_server::config::token_secret_from_env;
use gym_roster_server::services::auth::TokenSigner;

/// Issue a token for `subject` valid for `ttl_hours`, printing it to stdout.
///
/// # Errors
///
/// Returns an error if the secret is missing or weak, the TTL is not
/// positive, or the subject is invalid.
pub fn issue(subject: &str, ttl_hours: i64) -> Result<(), Box<dyn std::error::Error>> {
    if ttl_hours <= 0 {
        return Err("ttl-hours must be positive".into());
    }
    let ttl = Duration::try_hours(ttl_hours).ok_or("ttl-hours is too large")?;

    let signer = TokenSigner::new(token_secret_from_env()?);
    let token = signer.issue(subject, ttl, Utc::now())?;

    info!(subject, ttl_hours, "Token issued");
    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }
    Ok(())
}

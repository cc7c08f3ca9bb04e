//! issuetracker - command-line client for the DoneDone IssueTracker API
//!
//! Runs one API operation and prints the raw response body to stdout.
//! Logs go to stderr.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ISSUETRACKER_DOMAIN`: company subdomain
//! - `ISSUETRACKER_USERNAME`: account username
//! - `ISSUETRACKER_API_TOKEN` or `ISSUETRACKER_PASSWORD`: credential
//!
//! # Usage
//!
//! ```bash
//! issuetracker projects --with-issues --pretty
//! issuetracker comment 12 345 --text "Fixed in 1.4" --attach shot=./shot.png
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use issuetracker::{cli, client, config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();

    // stdout is reserved for response bodies
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("issuetracker=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(?config, "Configuration loaded");

    let client = client::TrackerClient::new(&config).context("Failed to create API client")?;

    if !args.no_check {
        client
            .test_connection()
            .await
            .context("Cannot reach the IssueTracker API")?;
    }

    let body = args
        .command
        .execute(&client)
        .await
        .map_err(|e| anyhow::anyhow!(e.sanitized_display(client.credential().expose())))
        .context("API call failed")?;

    println!("{}", cli::render(&body, args.pretty));

    Ok(())
}

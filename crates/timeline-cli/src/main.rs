//! `timeline` command-line client.
//!
//! - `timeline home|mentions|user|...` - read timelines
//! - `timeline show|post|delete|retweet` - single statuses
//! - `timeline favorites|favorite|unfavorite` - favorites
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

#![forbid(unsafe_code)]

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use twitter_timeline::{TimelineClient, TwitterConfig, TwitterError};

/// Twitter timelines, statuses, retweets and favorites from the command line.
#[derive(Parser)]
#[command(name = "timeline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file; `TWITTER_*` environment variables override it
    #[arg(long, short = 'c', env = "TIMELINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout is clean JSON.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let client = TimelineClient::new(&config).context("failed to create Twitter client")?;

    debug!(command = ?cli.command, "Running command");
    let output = cli
        .command
        .run(&client)
        .await
        .map_err(|err| with_credential_hint(err, &config))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Name the unset variables when an operation needed credentials.
fn with_credential_hint(err: anyhow::Error, config: &TwitterConfig) -> anyhow::Error {
    match err.downcast_ref::<TwitterError>() {
        Some(TwitterError::MissingAuthorization { .. }) => {
            let missing = config::missing_credential_vars(config.credentials.as_ref());
            err.context(format!("set {} to authorize", missing.join(", ")))
        }
        _ => err,
    }
}

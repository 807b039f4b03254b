pub mod canvas;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod hierarchy;
pub mod sampling;
pub mod session;

use clap::Parser;

use crate::errors::InspectorResult;

pub async fn run() -> InspectorResult<()> {
    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    // stdout carries the JSON output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    tracing::debug!(command = ?cli.command, "droidpick starting");
    cli::run_cli(cli).await
}

//! Harvest
//!
//! Exports workflow-run history from the forge's Actions API for every
//! repository listed in a CSV file.
//!
//! Architecture:
//! - Configuration: credential and limits from the environment (and `.env`)
//! - Repository list: CSV loader for the owner/repo pairs to export
//! - Sink: run directories and artifact writes on the local filesystem
//! - Exporter: per-repository, per-run orchestration of client and sink
//!
//! Each run is written under `all_workflow_runs/` and copied into
//! `failure_workflow_runs/` and `retry_workflow_runs/` when it qualifies.

mod config;
mod error;
mod export;
mod layout;
mod repo_list;
mod sink;
mod summary;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::export::Exporter;
use harvest_client::ForgeClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment, RUST_LOG included
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harvest_exporter=info,harvest_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Harvest");

    let config = load_config()?;
    info!(
        "Loaded configuration: api_url={}, repos_file={}, output_dir={}, max_runs={:?}",
        config.api_url,
        config.repos_file.display(),
        config.output_dir.display(),
        config.max_runs
    );

    let repos = repo_list::load_repositories(&config.repos_file)?;
    info!(
        "Loaded {} repositories from {}",
        repos.len(),
        config.repos_file.display()
    );

    let client = ForgeClient::new(&config.api_url, &config.token)
        .context("Failed to build forge client")?
        .with_timeouts(config.request_timeout, config.log_timeout);

    let summary = Exporter::new(&config, &client).export_all(&repos).await;
    summary.print();

    Ok(())
}

/// Loads and validates configuration from the environment
///
/// A missing credential aborts before any network activity.
fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

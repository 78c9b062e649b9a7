//! Approval bot for Renovate merge requests on GitLab
//!
//! Designed to run as a CI job right after Renovate: it walks the same
//! repository list, finds open Renovate merge requests whose pipelines are
//! green, and posts the configured approval note to each one.

use anyhow::{Context, Result};
use clap::Parser;
use mr_shipit::config::Config;
use mr_shipit::gitlab::GitLabClient;
use mr_shipit::{logging, reconcile, repolist};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "shipit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Approves Renovate merge requests on GitLab", long_about = None)]
struct Cli {
    /// Renovate config file to read repositories from (overrides CONFIG_PATH)
    #[arg(long, value_name = "FILE")]
    config_path: Option<PathBuf>,

    /// Evaluate every filter but post nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(path) = cli.config_path {
        config.config_path = path;
    }
    config.policy.dry_run = cli.dry_run;

    logging::init(&config.log);
    config.log_debug();

    let repositories =
        repolist::repositories(&config).context("failed to extract repositories")?;
    info!(count = repositories.len(), "reconciling repositories");

    let client = GitLabClient::new(&config.gitlab_token, &config.gitlab_url)
        .context("failed to create GitLab client")?;

    reconcile::reconcile_all(&config.policy, repositories, Arc::new(client)).await;

    Ok(())
}

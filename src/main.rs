//! image-updater-rs — Rust rewrite of a Python RHEL cloud image updater.
//!
//! Polls the Red Hat image catalog for the latest KVM qcow2 image per tracked
//! (major version, architecture) pair, downloads newly published images, and
//! records per-target checksums so unchanged images are never fetched twice.
//! One run processes all targets sequentially and exits; scheduling repeated
//! runs is left to cron or a systemd timer.

#![warn(clippy::all)]

mod auth;
mod catalog;
mod cli;
mod config;
mod download;
mod state;
mod sync;
mod types;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = match cli.log_level {
        types::LogLevel::Debug => "debug",
        types::LogLevel::Info => "info",
        types::LogLevel::Warn => "warn",
        types::LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // Configuration problems must surface before any network activity.
    let config = config::Config::load(&cli.config)?;
    tracing::info!(
        config = %cli.config.display(),
        targets = config.targets().len(),
        dry_run = cli.dry_run,
        "Starting image-updater-rs"
    );

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let summary = sync::run(&client, &config, cli.dry_run).await?;

    // Per-target failures are reported but do not fail the run; only
    // configuration and authentication errors exit non-zero.
    if summary.failed > 0 {
        tracing::warn!(
            failed = summary.failed,
            "Run completed with per-target failures; they will be retried next run"
        );
    }

    Ok(())
}

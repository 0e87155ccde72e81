//! Per-run orchestration: one token, then every target strictly in order.
//!
//! Only an authentication failure aborts the run. Each per-target failure is
//! logged and isolated; state is updated (and persisted synchronously) only
//! after that target's download fully succeeded, so a failed target is
//! retried wholesale on the next invocation.

use anyhow::Context;
use reqwest::Client;
use thiserror::Error;

use crate::auth::{self, AccessToken};
use crate::catalog::{self, CatalogError};
use crate::config::Config;
use crate::download::{self, DownloadError};
use crate::state::{StateError, SyncState};
use crate::types::Target;

/// Counts reported after a completed run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: u64,
    pub unchanged: u64,
    pub no_image: u64,
    pub failed: u64,
}

/// What happened to a single target within one run.
enum TargetOutcome {
    Downloaded,
    Unchanged,
    NoImage,
}

/// Per-target failure. Wrapped so the three failure classes log distinctly.
#[derive(Debug, Error)]
enum TargetError {
    #[error("Catalog query failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("State update failed after download: {0}")]
    State(#[from] StateError),
}

/// Run one full sync pass over the configured targets.
pub async fn run(client: &Client, config: &Config, dry_run: bool) -> anyhow::Result<RunSummary> {
    let token = auth::acquire_token(client, &config.access_token_url, &config.offline_token)
        .await
        .context("Failed to fetch an access token")?;

    let mut state = SyncState::load(&config.state_file)
        .await
        .context("Failed to load state file")?;

    let mut summary = RunSummary::default();
    for target in config.targets() {
        match sync_target(client, &token, config, &mut state, &target, dry_run).await {
            Ok(TargetOutcome::Downloaded) => summary.downloaded += 1,
            Ok(TargetOutcome::Unchanged) => summary.unchanged += 1,
            Ok(TargetOutcome::NoImage) => summary.no_image += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!(key = %target, error = %e, "Target failed, continuing");
            }
        }
    }

    tracing::info!(
        downloaded = summary.downloaded,
        unchanged = summary.unchanged,
        no_image = summary.no_image,
        failed = summary.failed,
        "Sync run complete"
    );
    Ok(summary)
}

/// Sync a single target: fetch the latest candidate, detect change, download,
/// record and persist.
async fn sync_target(
    client: &Client,
    token: &AccessToken,
    config: &Config,
    state: &mut SyncState,
    target: &Target,
    dry_run: bool,
) -> Result<TargetOutcome, TargetError> {
    let key = target.state_key();

    let Some(candidate) =
        catalog::fetch_latest(client, token, &config.img_list_url, target).await?
    else {
        tracing::info!(key = %key, "No matching image published, skipping");
        return Ok(TargetOutcome::NoImage);
    };

    tracing::debug!(
        key = %key,
        filename = %candidate.filename,
        minor = candidate.minor_version,
        "Latest candidate"
    );

    if !state.has_changed(&key, &candidate.checksum) {
        tracing::info!(
            key = %key,
            filename = %candidate.filename,
            "Checksum unchanged, nothing to do"
        );
        return Ok(TargetOutcome::Unchanged);
    }

    if dry_run {
        tracing::info!(
            key = %key,
            filename = %candidate.filename,
            "[DRY RUN] Would download"
        );
        return Ok(TargetOutcome::Downloaded);
    }

    let path = download::download(client, token, &candidate, &config.download_destination).await?;
    tracing::info!(key = %key, path = %path.display(), "Downloaded new image");

    state.record(key, candidate.checksum);
    state.persist(&config.state_file).await?;

    Ok(TargetOutcome::Downloaded)
}

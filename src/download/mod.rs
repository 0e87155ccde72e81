//! Streaming image download.
//!
//! Images are multi-GB, so the body is consumed in chunks with bounded
//! memory. Each download writes to a `.part` temp name and is renamed into
//! place only after the full stream is consumed, so a truncated transfer
//! never surfaces under the final filename.

pub mod error;

pub use error::DownloadError;

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::auth::AccessToken;
use crate::catalog::ImageCandidate;

/// Download `candidate` into `destination_dir`, returning the final path.
///
/// The destination directory is created if missing (single level; config is
/// expected to supply an existing parent). On any failure the partial `.part`
/// file is removed best-effort and no file appears under the final name.
pub async fn download(
    client: &Client,
    token: &AccessToken,
    candidate: &ImageCandidate,
    destination_dir: &Path,
) -> Result<PathBuf, DownloadError> {
    if let Err(e) = fs::create_dir(destination_dir).await {
        if e.kind() != std::io::ErrorKind::AlreadyExists {
            return Err(DownloadError::Disk(e));
        }
    }

    let final_path = destination_dir.join(&candidate.filename);
    let part_path = destination_dir.join(format!("{}.part", candidate.filename));

    match stream_to_part(client, token, candidate, &final_path, &part_path).await {
        Ok(bytes_written) => {
            tracing::info!(
                path = %final_path.display(),
                bytes = bytes_written,
                "Download complete"
            );
            Ok(final_path)
        }
        Err(e) => {
            let _ = fs::remove_file(&part_path).await;
            Err(e)
        }
    }
}

/// Single streaming pass: GET, write chunks to the `.part` file, rename.
async fn stream_to_part(
    client: &Client,
    token: &AccessToken,
    candidate: &ImageCandidate,
    final_path: &Path,
    part_path: &Path,
) -> Result<u64, DownloadError> {
    let response = client
        .get(&candidate.download_href)
        .bearer_auth(token.as_str())
        .send()
        .await
        .map_err(|source| DownloadError::Http {
            source,
            filename: candidate.filename.clone(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            status: status.as_u16(),
            filename: candidate.filename.clone(),
        });
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(part_path)
        .await?;

    let mut bytes_written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|source| DownloadError::Http {
            source,
            filename: candidate.filename.clone(),
        })?;
        file.write_all(&chunk).await?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    fs::rename(part_path, final_path).await?;

    Ok(bytes_written)
}

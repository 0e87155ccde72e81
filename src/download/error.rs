use thiserror::Error;

/// Failures while downloading an image. Per-target: the orchestrator logs
/// the error and leaves state untouched so the next run retries from scratch.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error {status} downloading {filename}")]
    HttpStatus { status: u16, filename: String },

    #[error("HTTP error downloading {filename}: {source}")]
    Http {
        source: reqwest::Error,
        filename: String,
    },

    #[error("Disk error: {0}")]
    Disk(#[from] std::io::Error),
}

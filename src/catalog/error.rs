use thiserror::Error;

/// Failures while querying the image listing API. These are per-target:
/// the orchestrator logs them and moves on to the next target.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Listing request for {url} returned HTTP {status}")]
    HttpStatus { status: u16, url: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

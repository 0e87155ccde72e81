use thiserror::Error;

/// Failures while exchanging the offline token for an access token.
///
/// Any of these aborts the whole run: no target can be processed without a
/// bearer token. The raw response body is kept for diagnostics.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token endpoint returned HTTP {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("Token response did not contain an access_token: {body}")]
    MissingAccessToken { body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

//! Token exchange against the Red Hat SSO endpoint.
//!
//! One form-encoded POST trades the long-lived offline token for a
//! short-lived bearer token. The token is reused for every catalog query and
//! download within a run; there is no refresh-on-expiry, so a token expiring
//! mid-run surfaces as an ordinary per-target HTTP failure.

pub mod error;
mod responses;

pub use error::AuthError;

use reqwest::Client;

use responses::TokenResponse;

/// Client identifier expected by the Red Hat SSO token endpoint.
const CLIENT_ID: &str = "rhsm-api";

/// Opaque bearer token, held in memory for one run and never persisted.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Exchange the offline token for a short-lived access token.
///
/// Any response that is not a 2xx JSON body carrying `access_token` fails the
/// call; the body text rides along on the error so the operator can see what
/// the SSO service actually said.
pub async fn acquire_token(
    client: &Client,
    token_url: &str,
    offline_token: &str,
) -> Result<AccessToken, AuthError> {
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", CLIENT_ID),
        ("refresh_token", offline_token),
    ];

    let response = client.post(token_url).form(&params).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }

    match serde_json::from_str::<TokenResponse>(&body) {
        Ok(token) => {
            tracing::debug!("Access token acquired");
            Ok(AccessToken(token.access_token))
        }
        Err(_) => Err(AuthError::MissingAccessToken { body }),
    }
}

use serde::Deserialize;

/// Response from the SSO token endpoint. Only `access_token` is consumed;
/// expiry is managed by the issuing service and not tracked here.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

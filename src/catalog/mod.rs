//! Catalog client for the Red Hat image listing API.

pub mod error;
pub mod pattern;
pub mod types;

pub use error::CatalogError;
pub use types::{ImageCandidate, ImageRecord};

use reqwest::Client;

use crate::auth::AccessToken;
use crate::types::Target;
use types::ListingResponse;

/// Page size for the listing request.
///
/// Known limitation carried over from the original tool: with more than 100
/// entries and unfavorable API ordering the newest release can fall outside
/// this window. Accepted for now; the catalog keeps well under 100 entries
/// per (major, arch) listing in practice.
const LISTING_LIMIT: u32 = 100;

/// Build the listing URL for one (major, architecture) pair.
fn listing_url(base_url: &str, target: &Target, limit: u32, offset: u32) -> String {
    format!(
        "{}/rhel-{}-for-{}-baseos-isos?limit={}&offset={}",
        base_url, target.rhel_major, target.architecture, limit, offset
    )
}

/// Fetch the newest KVM qcow2 image published for `target`.
///
/// Returns `Ok(None)` when no listed filename matches the target, a normal
/// state when no image has been published yet. Ties on the minor version keep
/// the first record seen: the comparison is strictly greater-than, matching
/// the original tool, since upstream ordering is unspecified.
pub async fn fetch_latest(
    client: &Client,
    token: &AccessToken,
    base_url: &str,
    target: &Target,
) -> Result<Option<ImageCandidate>, CatalogError> {
    let url = listing_url(base_url, target, LISTING_LIMIT, 0);
    tracing::debug!(%url, "Fetching image listing");

    let response = client
        .get(&url)
        .bearer_auth(token.as_str())
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus {
            status: status.as_u16(),
            url,
        });
    }

    let listing: ListingResponse = response.json().await?;

    let mut latest: Option<ImageCandidate> = None;
    for record in listing.body {
        let Some(minor) =
            pattern::kvm_image_minor(&record.filename, target.rhel_major, &target.architecture)
        else {
            continue;
        };
        if latest
            .as_ref()
            .map_or(true, |best| minor > best.minor_version)
        {
            latest = Some(ImageCandidate {
                filename: record.filename,
                download_href: record.download_href,
                checksum: record.checksum,
                minor_version: minor,
            });
        }
    }

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target() -> Target {
        Target {
            rhel_major: 9,
            architecture: "x86_64".to_string(),
        }
    }

    fn record(filename: &str, checksum: &str) -> serde_json::Value {
        serde_json::json!({
            "filename": filename,
            "downloadHref": format!("https://cdn.example.com/{}", filename),
            "checksum": checksum
        })
    }

    #[test]
    fn test_listing_url_shape() {
        assert_eq!(
            listing_url("https://api.example.com/images/v1", &target(), 100, 0),
            "https://api.example.com/images/v1/rhel-9-for-x86_64-baseos-isos?limit=100&offset=0"
        );
    }

    #[tokio::test]
    async fn test_selects_largest_minor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rhel-9-for-x86_64-baseos-isos"))
            .and(query_param("limit", "100"))
            .and(query_param("offset", "0"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "body": [
                    record("rhel-9.3-x86_64-kvm.qcow2", "abc"),
                    record("rhel-9.4-x86_64-kvm.qcow2", "def"),
                    record("rhel-9.4-x86_64-dvd.iso", "not-a-candidate"),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let candidate = fetch_latest(&client, &AccessToken::from("tok"), &server.uri(), &target())
            .await
            .unwrap()
            .expect("a candidate");
        assert_eq!(candidate.filename, "rhel-9.4-x86_64-kvm.qcow2");
        assert_eq!(candidate.checksum, "def");
        assert_eq!(candidate.minor_version, 4);
    }

    #[tokio::test]
    async fn test_tie_on_minor_keeps_first_seen() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rhel-9-for-x86_64-baseos-isos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "body": [
                    record("rhel-9.4-x86_64-kvm.qcow2", "first"),
                    record("rhel-9.4-x86_64-kvm.qcow2", "second"),
                ]
            })))
            .mount(&server)
            .await;

        let client = Client::new();
        let candidate = fetch_latest(&client, &AccessToken::from("tok"), &server.uri(), &target())
            .await
            .unwrap()
            .expect("a candidate");
        assert_eq!(candidate.checksum, "first");
    }

    #[tokio::test]
    async fn test_no_matching_filename_is_none_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rhel-9-for-x86_64-baseos-isos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "body": [
                    record("rhel-9.4-x86_64-dvd.iso", "x"),
                    record("rhel-8.10-x86_64-kvm.qcow2", "y"),
                ]
            })))
            .mount(&server)
            .await;

        let client = Client::new();
        let candidate = fetch_latest(&client, &AccessToken::from("tok"), &server.uri(), &target())
            .await
            .unwrap();
        assert!(candidate.is_none());
    }

    #[tokio::test]
    async fn test_http_error_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rhel-9-for-x86_64-baseos-isos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = Client::new();
        let err = fetch_latest(&client, &AccessToken::from("tok"), &server.uri(), &target())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rhel-9-for-x86_64-baseos-isos"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"meta": {}})),
            )
            .mount(&server)
            .await;

        let client = Client::new();
        let err = fetch_latest(&client, &AccessToken::from("tok"), &server.uri(), &target())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}

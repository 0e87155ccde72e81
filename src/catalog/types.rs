use serde::Deserialize;

/// Listing response from the catalog API. A response without a `body` array
/// is malformed and fails the query.
#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    pub body: Vec<ImageRecord>,
}

/// One image record as returned by the catalog. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    #[serde(rename = "downloadHref")]
    pub download_href: String,
    pub checksum: String,
}

/// The newest matching image for a target, chosen by minor version.
/// Ephemeral; never persisted directly.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub filename: String,
    pub download_href: String,
    pub checksum: String,
    pub minor_version: u32,
}

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::types::Target;

/// Default connect timeout for all HTTP calls. The original tool had none;
/// downloads are multi-GB so only connection establishment is bounded.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// One tracked major version with the architectures to sync for it.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackedMajor {
    pub rhel_major: u32,
    pub architectures: Vec<String>,
}

/// Application configuration, loaded from a JSON file before any network
/// activity. A missing required field fails deserialization with the field
/// name in the error, which aborts startup.
#[derive(Deserialize)]
pub struct Config {
    pub offline_token: String,
    pub access_token_url: String,
    pub img_list_url: String,
    pub rhel_major_versions_to_track: Vec<TrackedMajor>,
    pub state_file: PathBuf,
    pub download_destination: PathBuf,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("offline_token", &"<redacted>")
            .field("access_token_url", &self.access_token_url)
            .field("img_list_url", &self.img_list_url)
            .field(
                "rhel_major_versions_to_track",
                &self.rhel_major_versions_to_track,
            )
            .field("state_file", &self.state_file)
            .field("download_destination", &self.download_destination)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Flatten the tracked (major, architectures) entries into the target
    /// list, preserving configured order.
    pub fn targets(&self) -> Vec<Target> {
        self.rhel_major_versions_to_track
            .iter()
            .flat_map(|major| {
                major.architectures.iter().map(|arch| Target {
                    rhel_major: major.rhel_major,
                    architecture: arch.clone(),
                })
            })
            .collect()
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use super::error::StateError;

/// Recorded state for one target: the checksum of the last image
/// successfully downloaded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetState {
    pub checksum: String,
}

/// Last successfully synced checksum per target, keyed by `"{major}-{arch}"`.
///
/// Loaded once at startup, mutated in memory after each successful download,
/// and flushed wholesale to disk after each mutation. The file on disk is
/// always a complete JSON object: every persist writes a sibling temp file
/// and renames it into place.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState(BTreeMap<String, TargetState>);

impl SyncState {
    /// Load state from `path`. A missing file is an empty state (first run).
    pub async fn load(path: &Path) -> Result<Self, StateError> {
        let contents = match fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(StateError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents).map_err(|source| StateError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// True when `key` has no recorded checksum or the recorded checksum
    /// differs from `checksum`. Comparison is byte-exact and case-sensitive;
    /// no normalization.
    pub fn has_changed(&self, key: &str, checksum: &str) -> bool {
        self.0.get(key).map_or(true, |t| t.checksum != checksum)
    }

    /// Record a successful download of `checksum` for `key`.
    pub fn record(&mut self, key: String, checksum: String) {
        self.0.insert(key, TargetState { checksum });
    }

    /// Rewrite the whole mapping at `path`, creating the parent directory if
    /// missing. The temp-then-rename dance keeps a reader (or a crash) from
    /// ever observing a partially written file.
    pub async fn persist(&self, path: &Path) -> Result<(), StateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir(parent).await {
                    if e.kind() != std::io::ErrorKind::AlreadyExists {
                        return Err(StateError::Write {
                            path: path.to_path_buf(),
                            source: e,
                        });
                    }
                }
            }
        }

        let json = serde_json::to_string(self)?;
        let tmp_path = temp_state_path(path);

        fs::write(&tmp_path, json)
            .await
            .map_err(|source| StateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        fs::rename(&tmp_path, path)
            .await
            .map_err(|source| StateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(())
    }
}

/// Sibling temp name so the rename stays on one filesystem.
fn temp_state_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let state = SyncState::load(&dir.path().join("state.json")).await.unwrap();
        assert_eq!(state, SyncState::default());
    }

    #[tokio::test]
    async fn test_round_trip_is_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SyncState::default();
        state.record("9-x86_64".to_string(), "def".to_string());
        state.record("10-aarch64".to_string(), "abc".to_string());
        state.persist(&path).await.unwrap();

        let reloaded = SyncState::load(&path).await.unwrap();
        assert_eq!(reloaded, state);
    }

    #[tokio::test]
    async fn test_on_disk_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut state = SyncState::default();
        state.record("9-x86_64".to_string(), "def".to_string());
        state.persist(&path).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"9-x86_64": {"checksum": "def"}}));
        // No temp file left behind.
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_persist_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        SyncState::default().persist(&path).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_persist_missing_grandparent_is_write_error() {
        let dir = TempDir::new().unwrap();
        // Only the immediate parent is created on demand.
        let path = dir.path().join("deep").join("nested").join("state.json");

        let err = SyncState::default().persist(&path).await.unwrap_err();
        assert!(matches!(err, StateError::Write { .. }));
    }

    #[tokio::test]
    async fn test_corrupt_state_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = SyncState::load(&path).await.unwrap_err();
        assert!(matches!(err, StateError::Parse { .. }));
    }

    #[test]
    fn test_has_changed_absent_key() {
        let state = SyncState::default();
        assert!(state.has_changed("9-x86_64", "abc"));
    }

    #[test]
    fn test_has_changed_different_checksum() {
        let mut state = SyncState::default();
        state.record("9-x86_64".to_string(), "abc".to_string());
        assert!(state.has_changed("9-x86_64", "def"));
    }

    #[test]
    fn test_unchanged_only_on_exact_match() {
        let mut state = SyncState::default();
        state.record("9-x86_64".to_string(), "abc".to_string());
        assert!(!state.has_changed("9-x86_64", "abc"));
        // Case-sensitive, byte-exact.
        assert!(state.has_changed("9-x86_64", "ABC"));
    }
}

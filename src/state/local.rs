//! Local file state storage.
//!
//! Keeps the state document in a single JSON file, pretty-printed so it can
//! be inspected and hand-edited during development.

use super::{StateDocument, StateStore};
use crate::error::{Result, VaktError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{info, warn};

/// File-backed state store.
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl StateStore for LocalFileStore {
    async fn load(&self) -> StateDocument {
        if !self.path.exists() {
            info!("State file {} not found; starting fresh", self.path.display());
            return StateDocument::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(
                        "State file {} is unreadable ({}); starting fresh",
                        self.path.display(),
                        e
                    );
                    StateDocument::default()
                }
            },
            Err(e) => {
                warn!("Error reading state file {}: {}", self.path.display(), e);
                StateDocument::default()
            }
        }
    }

    async fn save(&self, doc: &StateDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content).map_err(|e| {
            VaktError::StateStore(format!(
                "Failed to write state file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("state.json"));

        let doc = store.load().await;
        assert!(doc.resolved.is_empty());
        assert!(doc.last_seen.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupted_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not valid json!!").unwrap();

        let store = LocalFileStore::new(&path);
        let doc = store.load().await;
        assert!(doc.resolved.is_empty());
        assert!(doc.last_seen.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let store = LocalFileStore::new(&path);

        let mut doc = StateDocument::default();
        doc.resolved
            .insert("@someone".to_string(), "UCabcdefghijklmnopqrstuv".to_string());
        doc.last_seen
            .insert("UCabcdefghijklmnopqrstuv".to_string(), "abc123def45".to_string());

        store.save(&doc).await.unwrap();
        assert!(path.exists());

        let reloaded = store.load().await;
        assert_eq!(reloaded, doc);
    }

    #[tokio::test]
    async fn test_save_to_unwritable_path_errors() {
        let store = LocalFileStore::new("/dev/null/impossible/state.json");
        let err = store.save(&StateDocument::default()).await;
        assert!(err.is_err());
    }
}

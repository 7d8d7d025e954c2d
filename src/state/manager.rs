//! In-memory state manager.

use super::{StateDocument, StateStore};
use crate::error::Result;
use std::sync::Arc;

/// In-memory cache over the loaded state document.
///
/// All mutations are plain map writes; nothing becomes durable until
/// [`StateManager::save`] runs. The manager does no locking of its own:
/// concurrent batches against one manager must be serialized by the owner
/// (the MCP server does this naturally by handling requests one at a time).
pub struct StateManager {
    store: Arc<dyn StateStore>,
    document: StateDocument,
}

impl StateManager {
    /// Create a manager with an empty document. Call [`load`](Self::load)
    /// to populate it from the store.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            document: StateDocument::default(),
        }
    }

    /// Replace the in-memory document with the stored one.
    pub async fn load(&mut self) {
        self.document = self.store.load().await;
    }

    /// Persist the current in-memory document.
    pub async fn save(&self) -> Result<()> {
        self.store.save(&self.document).await
    }

    /// Look up a cached channel resolution.
    pub fn get_resolved(&self, reference: &str) -> Option<&str> {
        self.document.resolved.get(reference).map(String::as_str)
    }

    /// Cache a channel resolution. The reference is stored verbatim.
    pub fn set_resolved(&mut self, reference: &str, channel_id: &str) {
        self.document
            .resolved
            .insert(reference.to_string(), channel_id.to_string());
    }

    /// Look up the last seen video for a channel.
    pub fn get_last_seen(&self, channel_id: &str) -> Option<&str> {
        self.document.last_seen.get(channel_id).map(String::as_str)
    }

    /// Record the newest observed video for a channel.
    pub fn set_last_seen(&mut self, channel_id: &str, video_id: &str) {
        self.document
            .last_seen
            .insert(channel_id.to_string(), video_id.to_string());
    }
}

//! Durable monitoring state for Vakt.
//!
//! Two maps travel together as one JSON document: the channel resolution
//! cache and the last-seen video per channel. The document is loaded once
//! when a monitor engine is constructed and written back once per batch.

mod http;
mod local;
mod manager;

pub use http::HttpObjectStore;
pub use local::LocalFileStore;
pub use manager::StateManager;

use crate::config::{Settings, StateBackend};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// The persisted state document.
///
/// Serialized shape is stable across backends:
///
/// ```json
/// { "resolved": { "<reference>": "<channelId>" },
///   "last_seen": { "<channelId>": "<videoId>" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateDocument {
    /// Channel reference string -> canonical channel ID. Permanent memoization;
    /// the key is the exact caller-supplied string, never normalized.
    #[serde(default)]
    pub resolved: HashMap<String, String>,
    /// Canonical channel ID -> most recently observed video ID.
    #[serde(default)]
    pub last_seen: HashMap<String, String>,
}

/// Trait for state storage backends.
///
/// `load` never fails: a missing or unreadable document yields an empty one.
/// First-run and corruption are handled identically. `save` overwrites the
/// whole document and propagates failures, since silently dropping state on
/// write would lose monitoring progress without anyone noticing.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state document, falling back to an empty one on any failure.
    async fn load(&self) -> StateDocument;

    /// Persist the whole state document, overwriting any previous version.
    async fn save(&self, doc: &StateDocument) -> Result<()>;
}

/// Build the configured state store.
pub fn store_from_settings(settings: &Settings) -> Result<Arc<dyn StateStore>> {
    match settings.state.backend {
        StateBackend::Local => Ok(Arc::new(LocalFileStore::new(settings.state_file_path()))),
        StateBackend::Http => {
            if settings.state.http_base_url.is_empty() {
                return Err(crate::error::VaktError::Config(
                    "state.http_base_url is required for the http backend".to_string(),
                ));
            }
            Ok(Arc::new(HttpObjectStore::new(
                &settings.state.http_base_url,
                &settings.state.http_container,
                &settings.state.http_object,
                settings.state.resolve_token(),
            )))
        }
    }
}

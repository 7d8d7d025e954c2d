//! Channel reference resolution.
//!
//! Turns whatever the caller hands us (full URL, @handle, /c/ or /user/
//! path, bare ID) into a canonical channel ID. Layered strategy, first hit
//! wins: durable cache, direct-ID pattern match, name search via the API.

use crate::state::StateManager;
use crate::youtube::ChannelApi;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves channel references to canonical channel IDs.
pub struct ChannelResolver {
    api: Arc<dyn ChannelApi>,
    /// Canonical channel IDs start with UC and are 24 characters total.
    id_re: Regex,
    handle_re: Regex,
    path_re: Regex,
}

impl ChannelResolver {
    pub fn new(api: Arc<dyn ChannelApi>) -> Self {
        Self {
            api,
            id_re: Regex::new(r"(UC[a-zA-Z0-9_-]{22})").expect("Invalid regex"),
            handle_re: Regex::new(r"@([a-zA-Z0-9_.-]+)").expect("Invalid regex"),
            path_re: Regex::new(r"/(?:c|user)/([a-zA-Z0-9_-]+)").expect("Invalid regex"),
        }
    }

    /// Resolve a reference to a channel ID, or `None` if it cannot be
    /// resolved. Successful resolutions are written back to the cache under
    /// the verbatim reference string, so identical future references never
    /// reach the API again.
    pub async fn resolve(&self, state: &mut StateManager, reference: &str) -> Option<String> {
        if let Some(cached) = state.get_resolved(reference) {
            debug!("Resolution cache hit for {}", reference);
            return Some(cached.to_string());
        }

        let mut channel_id = self.find_channel_id(reference);

        if channel_id.is_none() {
            if let Some(name) = self.extract_channel_name(reference) {
                channel_id = self.search_by_name(&name).await;
            }
        }

        if let Some(id) = &channel_id {
            state.set_resolved(reference, id);
        }

        channel_id
    }

    /// Scan the reference for a substring shaped like a channel ID.
    fn find_channel_id(&self, reference: &str) -> Option<String> {
        self.id_re
            .captures(reference)
            .map(|caps| caps[1].to_string())
    }

    /// Pull a channel handle or legacy path name out of the reference.
    fn extract_channel_name(&self, reference: &str) -> Option<String> {
        if let Some(caps) = self.handle_re.captures(reference) {
            return Some(caps[1].to_string());
        }
        self.path_re
            .captures(reference)
            .map(|caps| caps[1].to_string())
    }

    /// Search the API for a channel by name. Provider errors are non-fatal
    /// here; they log and count as "unresolved."
    async fn search_by_name(&self, name: &str) -> Option<String> {
        match self.api.search_channel(name).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Channel search for '{}' failed: {}", name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, VaktError};
    use crate::state::{LocalFileStore, StateManager};
    use crate::youtube::UploadSnippet;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock provider that answers every search with a fixed channel ID
    /// (or an error) and counts calls.
    struct CountingApi {
        search_result: Result<Option<String>>,
        search_calls: AtomicUsize,
    }

    impl CountingApi {
        fn returning(id: &str) -> Self {
            Self {
                search_result: Ok(Some(id.to_string())),
                search_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                search_result: Err(VaktError::YouTubeApi("quota exceeded".to_string())),
                search_calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChannelApi for CountingApi {
        async fn search_channel(&self, _name: &str) -> Result<Option<String>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            match &self.search_result {
                Ok(id) => Ok(id.clone()),
                Err(e) => Err(VaktError::YouTubeApi(e.to_string())),
            }
        }

        async fn latest_upload(&self, _channel_id: &str) -> Result<Option<UploadSnippet>> {
            unimplemented!("not used by resolver tests")
        }
    }

    fn state() -> (tempfile::TempDir, StateManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalFileStore::new(dir.path().join("state.json")));
        (dir, StateManager::new(store))
    }

    const ID: &str = "UCHnyfMqiRRG1u-2MsSQLbXA";

    #[tokio::test]
    async fn test_direct_id_resolves_without_lookup() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        let resolved = resolver
            .resolve(&mut state, &format!("https://www.youtube.com/channel/{}", ID))
            .await;
        assert_eq!(resolved.as_deref(), Some(ID));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_bare_id_resolves() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        assert_eq!(resolver.resolve(&mut state, ID).await.as_deref(), Some(ID));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_handle_resolves_via_search_once() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        let reference = "https://www.youtube.com/@veritasium";
        assert_eq!(resolver.resolve(&mut state, reference).await.as_deref(), Some(ID));
        // Second identical reference is served from the cache.
        assert_eq!(resolver.resolve(&mut state, reference).await.as_deref(), Some(ID));
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_legacy_paths_resolve_via_search() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        for reference in [
            "https://www.youtube.com/c/veritasium",
            "https://www.youtube.com/user/1veritasium",
        ] {
            assert_eq!(
                resolver.resolve(&mut state, reference).await.as_deref(),
                Some(ID),
                "reference: {}",
                reference
            );
        }
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_api_error_is_unresolved_and_uncached() {
        let api = Arc::new(CountingApi::failing());
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        let reference = "https://www.youtube.com/@veritasium";
        assert_eq!(resolver.resolve(&mut state, reference).await, None);
        assert_eq!(state.get_resolved(reference), None);
        // Failed resolutions are retried on the next call.
        assert_eq!(resolver.resolve(&mut state, reference).await, None);
        assert_eq!(api.calls(), 2);
    }

    #[tokio::test]
    async fn test_unparseable_reference_is_unresolved() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        assert_eq!(
            resolver.resolve(&mut state, "https://example.com/nothing-here").await,
            None
        );
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_different_references_cached_independently() {
        let api = Arc::new(CountingApi::returning(ID));
        let resolver = ChannelResolver::new(api.clone());
        let (_dir, mut state) = state();

        resolver.resolve(&mut state, "@veritasium").await;
        resolver.resolve(&mut state, ID).await;

        // Two different-looking references to the same channel, two entries.
        assert_eq!(state.get_resolved("@veritasium"), Some(ID));
        assert_eq!(state.get_resolved(ID), Some(ID));
    }
}

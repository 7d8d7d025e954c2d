//! Batch monitoring engine.

use super::{BatchStatus, ChannelError, ChannelResolver, LatestVideo, MonitorReport};
use crate::config::Settings;
use crate::error::{Result, VaktError};
use crate::state::{store_from_settings, StateManager, StateStore};
use crate::youtube::{ChannelApi, YouTubeApi};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Freshness evaluator over a list of channel references.
///
/// One engine owns one state document. Construct it once at process start
/// and route all batches through it; concurrent batches against a single
/// engine are not supported (the MCP server and CLI both run batches one
/// at a time, which is the required single-writer discipline).
pub struct ChannelMonitor {
    api: Arc<dyn ChannelApi>,
    resolver: ChannelResolver,
    state: StateManager,
}

impl ChannelMonitor {
    /// Create an engine and load its state document from the store.
    pub async fn new(api: Arc<dyn ChannelApi>, store: Arc<dyn StateStore>) -> Self {
        let mut state = StateManager::new(store);
        state.load().await;
        Self {
            resolver: ChannelResolver::new(api.clone()),
            api,
            state,
        }
    }

    /// Create an engine from application settings.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.youtube.resolve_api_key().ok_or_else(|| {
            VaktError::Config(
                "YouTube API key is required (set YOUTUBE_API_KEY or youtube.api_key)".to_string(),
            )
        })?;

        let api: Arc<dyn ChannelApi> = Arc::new(YouTubeApi::with_base_url(
            &api_key,
            &settings.youtube.api_base_url,
        ));
        let store = store_from_settings(settings)?;
        Ok(Self::new(api, store).await)
    }

    /// Run one monitoring batch over the given channel references.
    ///
    /// References are processed strictly in order; per-channel failures are
    /// collected and never abort the batch. The state document is flushed
    /// exactly once, after every reference has been attempted. A flush
    /// failure is recorded in [`MonitorReport::state_error`] rather than
    /// discarding the already-computed results.
    #[instrument(skip(self, references), fields(channels = references.len()))]
    pub async fn monitor(&mut self, references: &[String]) -> Result<MonitorReport> {
        let mut videos = Vec::new();
        let mut new_videos = Vec::new();
        let mut errors = Vec::new();

        for reference in references {
            let channel_id = match self.resolver.resolve(&mut self.state, reference).await {
                Some(id) => id,
                None => {
                    errors.push(ChannelError {
                        channel: reference.clone(),
                        error: "Could not resolve channel ID".to_string(),
                    });
                    continue;
                }
            };

            let snippet = match self.api.latest_upload(&channel_id).await {
                Ok(Some(snippet)) => snippet,
                Ok(None) => {
                    errors.push(ChannelError {
                        channel: reference.clone(),
                        error: "No videos found".to_string(),
                    });
                    continue;
                }
                Err(e) => {
                    warn!("Fetching latest video for {} failed: {}", channel_id, e);
                    errors.push(ChannelError {
                        channel: reference.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let is_new = self.state.get_last_seen(&channel_id) != Some(snippet.video_id.as_str());
            let video = LatestVideo::from_snippet(snippet, &channel_id, reference, is_new);

            if is_new {
                info!("New video on {}: {}", video.channel_title, video.video_title);
                self.state.set_last_seen(&channel_id, &video.video_id);
                new_videos.push(video.clone());
            }

            videos.push(video);
        }

        // One flush per batch, win or lose. Crashing before this point
        // re-reports this batch's new videos on the next run.
        let state_error = match self.state.save().await {
            Ok(()) => None,
            Err(e) => {
                error!("State flush failed, batch discoveries not durable: {}", e);
                Some(e.to_string())
            }
        };

        let status = if videos.is_empty() && !errors.is_empty() {
            BatchStatus::Failed
        } else if !errors.is_empty() {
            BatchStatus::Partial
        } else {
            BatchStatus::Success
        };

        Ok(MonitorReport {
            status,
            total_channels: references.len(),
            successful_channels: videos.len(),
            videos,
            new_videos,
            errors,
            state_error,
        })
    }

    /// Single-channel convenience form: the latest video for one reference.
    pub async fn latest(&mut self, reference: &str) -> Result<LatestVideo> {
        let refs = [reference.to_string()];
        let mut report = self.monitor(&refs).await?;

        if let Some(video) = report.videos.pop() {
            return Ok(video);
        }

        let message = report
            .errors
            .first()
            .map(|e| e.error.clone())
            .unwrap_or_else(|| "No result for channel".to_string());
        Err(VaktError::Monitor(format!("{}: {}", reference, message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LocalFileStore, StateDocument};
    use crate::youtube::UploadSnippet;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const CHAN_A: &str = "UCaaaaaaaaaaaaaaaaaaaaaa";
    const CHAN_B: &str = "UCbbbbbbbbbbbbbbbbbbbbbb";

    fn snippet(video_id: &str, title: &str) -> UploadSnippet {
        UploadSnippet {
            channel_title: "Test Channel".to_string(),
            video_id: video_id.to_string(),
            title: title.to_string(),
            description: "A description".to_string(),
            published_at: None,
            thumbnail_url: None,
        }
    }

    /// Scripted provider: per-channel latest uploads, plus call counters.
    #[derive(Default)]
    struct ScriptedApi {
        uploads: Mutex<HashMap<String, UploadSnippet>>,
        search: HashMap<String, String>,
        search_calls: AtomicUsize,
        upload_calls: AtomicUsize,
    }

    impl ScriptedApi {
        fn with_upload(self, channel_id: &str, s: UploadSnippet) -> Self {
            self.uploads.lock().unwrap().insert(channel_id.to_string(), s);
            self
        }

        fn with_search(mut self, name: &str, channel_id: &str) -> Self {
            self.search.insert(name.to_string(), channel_id.to_string());
            self
        }

        fn set_upload(&self, channel_id: &str, s: UploadSnippet) {
            self.uploads.lock().unwrap().insert(channel_id.to_string(), s);
        }
    }

    #[async_trait]
    impl ChannelApi for ScriptedApi {
        async fn search_channel(&self, name: &str) -> Result<Option<String>> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.search.get(name).cloned())
        }

        async fn latest_upload(&self, channel_id: &str) -> Result<Option<UploadSnippet>> {
            self.upload_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.uploads.lock().unwrap().get(channel_id).cloned())
        }
    }

    /// Store whose saves always fail.
    struct BrokenStore;

    #[async_trait]
    impl StateStore for BrokenStore {
        async fn load(&self) -> StateDocument {
            StateDocument::default()
        }

        async fn save(&self, _doc: &StateDocument) -> Result<()> {
            Err(VaktError::StateStore("disk full".to_string()))
        }
    }

    fn file_store(dir: &tempfile::TempDir) -> Arc<LocalFileStore> {
        Arc::new(LocalFileStore::new(dir.path().join("state.json")))
    }

    #[tokio::test]
    async fn test_first_seen_channel_is_new() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("vidAAAAAAAA", "First")));
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let report = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert_eq!(report.status, BatchStatus::Success);
        assert_eq!(report.videos.len(), 1);
        assert!(report.videos[0].is_new);
        assert_eq!(report.new_videos.len(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_video_is_not_new() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("vidAAAAAAAA", "First")));
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let first = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert!(first.videos[0].is_new);

        let second = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert!(!second.videos[0].is_new);
        assert!(second.new_videos.is_empty());
    }

    #[tokio::test]
    async fn test_new_video_advances_last_seen() {
        let dir = tempfile::tempdir().unwrap();
        let store = file_store(&dir);
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("videoAAAAAA", "Old")));
        let mut monitor = ChannelMonitor::new(api.clone(), store.clone()).await;

        monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();

        api.set_upload(CHAN_A, snippet("videoBBBBBB", "New"));
        let report = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert!(report.videos[0].is_new);
        assert_eq!(report.videos[0].video_id, "videoBBBBBB");

        // The advance is durable after the batch flush.
        let doc = store.load().await;
        assert_eq!(doc.last_seen.get(CHAN_A).map(String::as_str), Some("videoBBBBBB"));
    }

    #[tokio::test]
    async fn test_partial_batch() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedApi::default()
                .with_upload(CHAN_A, snippet("vidAAAAAAAA", "A"))
                .with_upload(CHAN_B, snippet("vidBBBBBBBB", "B")),
        );
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let refs = vec![
            CHAN_A.to_string(),
            "https://example.com/unresolvable".to_string(),
            CHAN_B.to_string(),
        ];
        let report = monitor.monitor(&refs).await.unwrap();

        assert_eq!(report.status, BatchStatus::Partial);
        assert_eq!(report.total_channels, 3);
        assert_eq!(report.successful_channels, 2);
        assert_eq!(report.videos.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].channel, "https://example.com/unresolvable");
        // Output order matches input order.
        assert_eq!(report.videos[0].channel_id, CHAN_A);
        assert_eq!(report.videos[1].channel_id, CHAN_B);
    }

    #[tokio::test]
    async fn test_all_failed_batch() {
        let dir = tempfile::tempdir().unwrap();
        // Resolvable channel, but no uploads scripted -> "No videos found".
        let api = Arc::new(ScriptedApi::default());
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let report = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert_eq!(report.status, BatchStatus::Failed);
        assert_eq!(report.errors[0].error, "No videos found");
    }

    #[tokio::test]
    async fn test_empty_batch_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default());
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let report = monitor.monitor(&[]).await.unwrap();
        assert_eq!(report.status, BatchStatus::Success);
        assert!(report.videos.is_empty());
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_processed_independently() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("vidAAAAAAAA", "A")));
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let refs = vec![CHAN_A.to_string(), CHAN_A.to_string()];
        let report = monitor.monitor(&refs).await.unwrap();
        assert_eq!(report.videos.len(), 2);
        // First occurrence claims the video; the duplicate sees it as seen.
        assert!(report.videos[0].is_new);
        assert!(!report.videos[1].is_new);
    }

    #[tokio::test]
    async fn test_resolution_cached_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedApi::default()
                .with_search("veritasium", CHAN_A)
                .with_upload(CHAN_A, snippet("vidAAAAAAAA", "A")),
        );
        let mut monitor = ChannelMonitor::new(api.clone(), file_store(&dir)).await;

        let refs = vec!["https://www.youtube.com/@veritasium".to_string()];
        monitor.monitor(&refs).await.unwrap();
        monitor.monitor(&refs).await.unwrap();

        assert_eq!(api.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.upload_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_results() {
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("vidAAAAAAAA", "A")));
        let mut monitor = ChannelMonitor::new(api, Arc::new(BrokenStore)).await;

        let report = monitor.monitor(&[CHAN_A.to_string()]).await.unwrap();
        assert_eq!(report.videos.len(), 1);
        assert!(report.state_error.as_deref().unwrap().contains("disk full"));
    }

    #[tokio::test]
    async fn test_latest_single_channel() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedApi::default().with_upload(CHAN_A, snippet("vidAAAAAAAA", "A")));
        let mut monitor = ChannelMonitor::new(api, file_store(&dir)).await;

        let video = monitor.latest(CHAN_A).await.unwrap();
        assert_eq!(video.video_id, "vidAAAAAAAA");

        let err = monitor.latest("https://example.com/nope").await.unwrap_err();
        assert!(matches!(err, VaktError::Monitor(_)));
    }
}

//! YouTube provider clients.
//!
//! `api` talks to the YouTube Data API v3 (channel search, uploads lookup);
//! `transcript` fetches caption tracks straight from the watch page without
//! downloading any media.

mod api;
mod transcript;

pub use api::YouTubeApi;
pub use transcript::{extract_video_id, TranscriptFetcher};

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Snippet of a channel's most recent upload.
#[derive(Debug, Clone)]
pub struct UploadSnippet {
    /// The uploading channel's display title.
    pub channel_title: String,
    /// Video ID (11 characters).
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Full video description.
    pub description: String,
    /// Publish timestamp.
    pub published_at: Option<DateTime<Utc>>,
    /// High-resolution thumbnail URL, if any.
    pub thumbnail_url: Option<String>,
}

/// Trait for the channel metadata/search provider.
///
/// Both operations return `Ok(None)` for "nothing found"; `Err` means the
/// provider itself rejected or failed the call.
#[async_trait]
pub trait ChannelApi: Send + Sync {
    /// Search for a channel by name and return the top match's channel ID.
    async fn search_channel(&self, name: &str) -> Result<Option<String>>;

    /// Fetch the most recent upload for a channel, via its uploads playlist.
    async fn latest_upload(&self, channel_id: &str) -> Result<Option<UploadSnippet>>;
}

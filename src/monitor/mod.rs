//! Channel monitoring engine.
//!
//! Resolves user-supplied channel references to canonical channel IDs,
//! tracks the last seen video per channel, and classifies each channel's
//! latest upload as new or unchanged across invocations.

mod engine;
mod resolver;

pub use engine::ChannelMonitor;
pub use resolver::ChannelResolver;

use crate::youtube::UploadSnippet;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum description length carried in results.
const DESCRIPTION_LIMIT: usize = 200;

/// A channel's latest video, as reported by one monitoring pass.
#[derive(Debug, Clone, Serialize)]
pub struct LatestVideo {
    pub channel_id: String,
    pub channel_title: String,
    pub video_id: String,
    pub video_title: String,
    /// Description truncated to a readable length.
    pub video_description: String,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    /// Canonical watch URL.
    pub video_url: String,
    /// Whether this video was first observed in this pass.
    pub is_new: bool,
    /// The reference string the caller supplied for this channel.
    pub channel_ref: String,
}

impl LatestVideo {
    fn from_snippet(
        snippet: UploadSnippet,
        channel_id: &str,
        channel_ref: &str,
        is_new: bool,
    ) -> Self {
        let video_url = format!("https://www.youtube.com/watch?v={}", snippet.video_id);
        Self {
            channel_id: channel_id.to_string(),
            channel_title: snippet.channel_title,
            video_id: snippet.video_id,
            video_title: snippet.title,
            video_description: truncate_description(&snippet.description),
            published_at: snippet.published_at,
            thumbnail_url: snippet.thumbnail_url,
            video_url,
            is_new,
            channel_ref: channel_ref.to_string(),
        }
    }
}

/// A per-channel failure inside a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelError {
    /// The reference string that failed.
    pub channel: String,
    pub error: String,
}

/// Overall outcome of one monitoring batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every requested channel produced a result.
    Success,
    /// Some channels produced results, some failed.
    Partial,
    /// No channel produced a result and at least one failed.
    Failed,
}

/// Result of one monitoring batch over a list of channel references.
#[derive(Debug, Serialize)]
pub struct MonitorReport {
    pub status: BatchStatus,
    pub total_channels: usize,
    pub successful_channels: usize,
    /// One entry per successfully processed reference, in input order.
    pub videos: Vec<LatestVideo>,
    /// The subset of `videos` first observed in this pass.
    pub new_videos: Vec<LatestVideo>,
    pub errors: Vec<ChannelError>,
    /// Set when the terminal state flush failed. Per-channel results are
    /// still valid; this batch's discoveries were not made durable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_error: Option<String>,
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_LIMIT {
        return description.to_string();
    }
    let truncated: String = description.chars().take(DESCRIPTION_LIMIT).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_description() {
        assert_eq!(truncate_description("short"), "short");

        let long = "x".repeat(250);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.len(), DESCRIPTION_LIMIT + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_latest_video_watch_url() {
        let video = LatestVideo::from_snippet(
            UploadSnippet {
                channel_title: "Chan".to_string(),
                video_id: "abc123def45".to_string(),
                title: "Title".to_string(),
                description: String::new(),
                published_at: None,
                thumbnail_url: None,
            },
            "UCabcdefghijklmnopqrstuv",
            "@chan",
            true,
        );
        assert_eq!(video.video_url, "https://www.youtube.com/watch?v=abc123def45");
        assert!(video.is_new);
        assert_eq!(video.channel_ref, "@chan");
    }
}

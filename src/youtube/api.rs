//! YouTube Data API v3 client.

use super::{ChannelApi, UploadSnippet};
use crate::error::{Result, VaktError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Client for the YouTube Data API.
pub struct YouTubeApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeApi {
    /// Create a client against the public API endpoint.
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, resource);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VaktError::YouTubeApi(format!(
                "{} returned HTTP {}: {}",
                resource,
                status,
                truncate(&body, 200)
            )));
        }

        Ok(response.json::<T>().await?)
    }

    /// Look up a channel's uploads playlist ID.
    async fn uploads_playlist(&self, channel_id: &str) -> Result<Option<String>> {
        let response: ChannelListResponse = self
            .get("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .map(|c| c.content_details.related_playlists.uploads))
    }
}

#[async_trait]
impl ChannelApi for YouTubeApi {
    async fn search_channel(&self, name: &str) -> Result<Option<String>> {
        debug!("Searching for channel by name: {}", name);
        let response: SearchListResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", name),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .map(|item| item.snippet.channel_id))
    }

    async fn latest_upload(&self, channel_id: &str) -> Result<Option<UploadSnippet>> {
        let playlist_id = match self.uploads_playlist(channel_id).await? {
            Some(id) => id,
            None => return Ok(None),
        };

        debug!("Fetching head of uploads playlist {}", playlist_id);
        let response: PlaylistItemsResponse = self
            .get(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", playlist_id.as_str()),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        let item = match response.items.into_iter().next() {
            Some(item) => item,
            None => return Ok(None),
        };

        let snippet = item.snippet;
        Ok(Some(UploadSnippet {
            channel_title: snippet.channel_title,
            video_id: snippet.resource_id.video_id,
            title: snippet.title,
            description: snippet.description,
            published_at: snippet.published_at,
            thumbnail_url: snippet.thumbnails.and_then(|t| t.best_url()),
        }))
    }
}

/// Truncate text with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

// Response payloads, trimmed to the fields Vakt reads.

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    channel_title: String,
    title: String,
    #[serde(default)]
    description: String,
    published_at: Option<DateTime<Utc>>,
    resource_id: ResourceId,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

impl Thumbnails {
    fn best_url(self) -> Option<String> {
        self.high
            .or(self.medium)
            .or(self.default)
            .map(|t| t.url)
    }
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

//! Transcript fetching from the YouTube watch page.
//!
//! YouTube exposes caption tracks as JSON embedded in the watch page player
//! config. We pull the track list from there and fetch the selected track in
//! `json3` format, so no API key or media download is involved.

use crate::error::{Result, VaktError};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const DEFAULT_WATCH_BASE: &str = "https://www.youtube.com";

/// Extract a YouTube video ID from a URL or bare 11-character ID.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(VaktError::InvalidInput("Empty video reference".to_string()));
    }

    let id_re = Regex::new(r"^[0-9A-Za-z_-]{11}$").expect("Invalid regex");
    if id_re.is_match(input) {
        return Ok(input.to_string());
    }

    // Tolerate scheme-less URLs like "youtube.com/watch?v=..."
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    if let Ok(url) = Url::parse(&candidate) {
        let host = url.host_str().unwrap_or("").to_lowercase();

        if host.contains("youtube.com") {
            // Standard watch?v=VIDEOID
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                if v.len() == 11 {
                    return Ok(v.to_string());
                }
            }
            // /embed/VIDEOID, /v/VIDEOID, /shorts/VIDEOID
            if let Some(mut segments) = url.path_segments() {
                while let Some(segment) = segments.next() {
                    if matches!(segment, "embed" | "v" | "shorts") {
                        if let Some(next) = segments.next() {
                            if next.len() == 11 {
                                return Ok(next.to_string());
                            }
                        }
                        break;
                    }
                }
            }
        }

        // Short URL youtu.be/VIDEOID
        if host.contains("youtu.be") {
            if let Some(segment) = url.path_segments().and_then(|mut s| s.next()) {
                if segment.len() >= 11 {
                    let head = &segment[..11];
                    if id_re.is_match(head) {
                        return Ok(head.to_string());
                    }
                }
            }
        }
    }

    // Fallback: first 11-character ID-shaped substring anywhere
    let loose_re = Regex::new(r"([0-9A-Za-z_-]{11})").expect("Invalid regex");
    if let Some(caps) = loose_re.captures(input) {
        return Ok(caps[1].to_string());
    }

    Err(VaktError::InvalidInput(format!(
        "Could not extract YouTube video ID from: {}",
        input
    )))
}

/// Caption track metadata from the player config.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    /// "asr" marks auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

/// Fetches video transcripts by scraping the watch page caption tracks.
pub struct TranscriptFetcher {
    client: reqwest::Client,
    watch_base: String,
    language: String,
}

impl TranscriptFetcher {
    /// Create a fetcher preferring the given transcript language.
    pub fn new(language: &str) -> Self {
        Self::with_watch_base(language, DEFAULT_WATCH_BASE)
    }

    /// Create a fetcher against a custom watch-page host (used by tests).
    pub fn with_watch_base(language: &str, watch_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            watch_base: watch_base.trim_end_matches('/').to_string(),
            language: language.to_string(),
        }
    }

    /// Fetch and join the transcript for a video ID.
    pub async fn fetch(&self, video_id: &str) -> Result<String> {
        let watch_url = format!("{}/watch?v={}", self.watch_base, video_id);
        debug!("Fetching watch page {}", watch_url);

        let page = self
            .client
            .get(&watch_url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()
            .map_err(|e| VaktError::Transcript(format!("Watch page fetch failed: {}", e)))?
            .text()
            .await?;

        let tracks = parse_caption_tracks(&page)
            .ok_or_else(|| VaktError::NoTranscript(video_id.to_string()))?;

        let track = select_track(&tracks, &self.language)
            .ok_or_else(|| VaktError::NoTranscript(video_id.to_string()))?;

        let track_url = format!("{}&fmt=json3", track.base_url);
        debug!("Fetching caption track ({})", track.language_code);

        let body: TimedText = self
            .client
            .get(&track_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| VaktError::Transcript(format!("Caption track fetch failed: {}", e)))?
            .json()
            .await
            .map_err(|e| VaktError::Transcript(format!("Unreadable caption track: {}", e)))?;

        let transcript = join_events(&body);
        if transcript.is_empty() {
            return Err(VaktError::NoTranscript(video_id.to_string()));
        }

        Ok(transcript)
    }
}

/// Locate and parse the `"captionTracks"` array in the watch page HTML.
fn parse_caption_tracks(page: &str) -> Option<Vec<CaptionTrack>> {
    let key = "\"captionTracks\":";
    let start = page.find(key)? + key.len();
    let array = extract_json_array(&page[start..])?;
    serde_json::from_str(array).ok()
}

/// Extract a balanced JSON array from the start of `source`.
///
/// Bracket depth is tracked outside of string literals so URLs containing
/// brackets do not throw the scan off.
fn extract_json_array(source: &str) -> Option<&str> {
    let bytes = source.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Pick a caption track: preferred language first (manual over auto-generated),
/// then any track in the preferred language, then the first track.
fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == language && t.kind.as_deref() != Some("asr"))
        .or_else(|| tracks.iter().find(|t| t.language_code == language))
        .or_else(|| tracks.first())
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

/// Join caption segments into a single normalized string.
fn join_events(body: &TimedText) -> String {
    let parts: Vec<&str> = body
        .events
        .iter()
        .flat_map(|e| e.segs.iter())
        .map(|s| s.utf8.trim())
        .filter(|s| !s.is_empty())
        .collect();
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_video_id_formats() {
        let cases = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ&t=30s",
            "dQw4w9WgXcQ",
        ];
        for case in cases {
            assert_eq!(extract_video_id(case).unwrap(), "dQw4w9WgXcQ", "case: {}", case);
        }
    }

    #[test]
    fn test_extract_video_id_rejects_garbage() {
        assert!(extract_video_id("").is_err());
        assert!(extract_video_id("not an id").is_err());
    }

    #[test]
    fn test_extract_json_array_balanced() {
        let src = r#"[{"a":"x[y]","b":[1,2]},{"c":3}] trailing"#;
        assert_eq!(
            extract_json_array(src),
            Some(r#"[{"a":"x[y]","b":[1,2]},{"c":3}]"#)
        );
        assert_eq!(extract_json_array("not an array"), None);
    }

    #[test]
    fn test_select_track_prefers_manual_language_match() {
        let tracks: Vec<CaptionTrack> = serde_json::from_str(
            r#"[
                {"baseUrl":"u1","languageCode":"en","kind":"asr"},
                {"baseUrl":"u2","languageCode":"en"},
                {"baseUrl":"u3","languageCode":"de"}
            ]"#,
        )
        .unwrap();

        assert_eq!(select_track(&tracks, "en").unwrap().base_url, "u2");
        assert_eq!(select_track(&tracks, "de").unwrap().base_url, "u3");
        // Unknown language falls back to the first track
        assert_eq!(select_track(&tracks, "fr").unwrap().base_url, "u1");
    }

    #[tokio::test]
    async fn test_fetch_joins_segments() {
        let server = MockServer::start().await;
        let track_url = format!("{}/api/timedtext?v=dQw4w9WgXcQ&lang=en", server.uri());

        let page = format!(
            r#"<html>..."captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{}","languageCode":"en"}}]}}}}...</html>"#,
            track_url
        );

        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "dQw4w9WgXcQ"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/timedtext"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"events":[
                    {"segs":[{"utf8":"Never gonna"},{"utf8":" give "}]},
                    {"segs":[{"utf8":"you up"}]},
                    {"segs":[{"utf8":"\n"}]}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let fetcher = TranscriptFetcher::with_watch_base("en", &server.uri());
        let transcript = fetcher.fetch("dQw4w9WgXcQ").await.unwrap();
        assert_eq!(transcript, "Never gonna give you up");
    }

    #[tokio::test]
    async fn test_fetch_without_captions_is_no_transcript() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html>no captions here</html>"),
            )
            .mount(&server)
            .await;

        let fetcher = TranscriptFetcher::with_watch_base("en", &server.uri());
        let err = fetcher.fetch("dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, VaktError::NoTranscript(_)));
    }
}

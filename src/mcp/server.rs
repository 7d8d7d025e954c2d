//! MCP server implementation.

use super::protocol::*;
use super::tools::get_tools;
use crate::config::Settings;
use crate::monitor::ChannelMonitor;
use crate::summarize::{Summarizer, SummaryOptions};
use crate::youtube::{extract_video_id, TranscriptFetcher};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "vakt";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Vakt.
///
/// Engines are constructed once during `initialize` and owned here for the
/// lifetime of the server; the stdio request loop handles one request at a
/// time, so monitoring batches never overlap.
pub struct McpServer {
    settings: Settings,
    monitor: Option<ChannelMonitor>,
    transcripts: Option<TranscriptFetcher>,
    summarizer: Option<Summarizer>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            monitor: None,
            transcripts: None,
            summarizer: None,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        info!("Vakt MCP server starting");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id).await,
            "initialized" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request: construct the engines up front.
    async fn handle_initialize(&mut self, id: Option<Value>) -> JsonRpcResponse {
        self.transcripts = Some(TranscriptFetcher::new(
            &self.settings.youtube.transcript_language,
        ));
        self.summarizer = Some(Summarizer::new(&self.settings.summarize));

        // Monitoring needs a YouTube API key; the other tools do not.
        match ChannelMonitor::from_settings(&self.settings).await {
            Ok(monitor) => {
                self.monitor = Some(monitor);
                info!("Channel monitor initialized");
            }
            Err(e) => {
                warn!("Channel monitor unavailable: {}", e);
            }
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, &e.to_string()),
        }
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, &e.to_string()),
        }
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&mut self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        info!("Tool call: {}", params.name);

        let result = match params.name.as_str() {
            "youtube_transcribe" => self.tool_transcribe(params.arguments).await,
            "summarize_text" => self.tool_summarize(params.arguments).await,
            "youtube_channels_monitor" => self.tool_monitor(params.arguments).await,
            "youtube_channel_latest" => self.tool_latest(params.arguments).await,
            "youtube_summarize_latest" => self.tool_summarize_latest(params.arguments).await,
            "health_check" => self.tool_health_check(),
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, &e.to_string()),
        }
    }

    /// Transcript tool.
    async fn tool_transcribe(&self, args: Option<Value>) -> ToolCallResult {
        let args = args.unwrap_or_else(|| json!({}));

        let input = args
            .get("video_id")
            .and_then(|v| v.as_str())
            .or_else(|| args.get("url").and_then(|v| v.as_str()));

        let input = match input {
            Some(i) => i,
            None => {
                return ToolCallResult::error(
                    "Either 'url' or 'video_id' must be provided".to_string(),
                )
            }
        };

        let video_id = match extract_video_id(input) {
            Ok(id) => id,
            Err(e) => return ToolCallResult::error(e.to_string()),
        };

        let fetcher = match &self.transcripts {
            Some(f) => f,
            None => return ToolCallResult::error("Server not initialized".to_string()),
        };

        match fetcher.fetch(&video_id).await {
            Ok(transcript) => ToolCallResult::json(&json!({
                "video_id": video_id,
                "transcript": transcript,
            })),
            Err(e) => ToolCallResult::error(format!("Transcript fetch failed: {}", e)),
        }
    }

    /// Summarize tool.
    async fn tool_summarize(&self, args: Option<Value>) -> ToolCallResult {
        let args = args.unwrap_or_else(|| json!({}));

        let text = match args.get("text").and_then(|v| v.as_str()) {
            Some(t) if !t.trim().is_empty() => t,
            _ => return ToolCallResult::error("Missing 'text' argument".to_string()),
        };

        let summarizer = match &self.summarizer {
            Some(s) => s,
            None => return ToolCallResult::error("Server not initialized".to_string()),
        };

        let options = summary_options_from(&args, &self.settings);

        match summarizer.summarize(text, &options).await {
            Ok(summary) => ToolCallResult::json(&json!({
                "summary": summary,
                "style": options.style,
            })),
            Err(e) => ToolCallResult::error(format!("Summarization failed: {}", e)),
        }
    }

    /// Channel monitoring tool.
    async fn tool_monitor(&mut self, args: Option<Value>) -> ToolCallResult {
        let channels = match channel_list_from(args.as_ref()) {
            Ok(channels) => channels,
            Err(message) => return ToolCallResult::error(message),
        };

        let monitor = match &mut self.monitor {
            Some(m) => m,
            None => {
                return ToolCallResult::error(
                    "Channel monitoring is unavailable: YouTube API key not configured".to_string(),
                )
            }
        };

        match monitor.monitor(&channels).await {
            Ok(report) => ToolCallResult::json(&report),
            Err(e) => ToolCallResult::error(format!("Monitoring failed: {}", e)),
        }
    }

    /// Single-channel latest-video tool.
    async fn tool_latest(&mut self, args: Option<Value>) -> ToolCallResult {
        let args = args.unwrap_or_else(|| json!({}));

        let channel = match args.get("channel").and_then(|v| v.as_str()) {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => return ToolCallResult::error("Missing 'channel' argument".to_string()),
        };

        let monitor = match &mut self.monitor {
            Some(m) => m,
            None => {
                return ToolCallResult::error(
                    "Channel monitoring is unavailable: YouTube API key not configured".to_string(),
                )
            }
        };

        match monitor.latest(&channel).await {
            Ok(video) => ToolCallResult::json(&video),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }

    /// Composite tool: monitor channels, then transcribe and summarize.
    async fn tool_summarize_latest(&mut self, args: Option<Value>) -> ToolCallResult {
        let channels = match channel_list_from(args.as_ref()) {
            Ok(channels) => channels,
            Err(message) => return ToolCallResult::error(message),
        };

        let args = args.unwrap_or_else(|| json!({}));
        let max_videos = args.get("max_videos").and_then(|v| v.as_u64()).unwrap_or(5) as usize;
        let style = args
            .get("style")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.settings.summarize.style)
            .to_string();

        let report = {
            let monitor = match &mut self.monitor {
                Some(m) => m,
                None => {
                    return ToolCallResult::error(
                        "Channel monitoring is unavailable: YouTube API key not configured"
                            .to_string(),
                    )
                }
            };
            match monitor.monitor(&channels).await {
                Ok(report) => report,
                Err(e) => return ToolCallResult::error(format!("Monitoring failed: {}", e)),
            }
        };

        let (fetcher, summarizer) = match (&self.transcripts, &self.summarizer) {
            (Some(f), Some(s)) => (f, s),
            _ => return ToolCallResult::error("Server not initialized".to_string()),
        };

        // Prefer new videos, fall back to everything the batch saw.
        let candidates = if report.new_videos.is_empty() {
            &report.videos
        } else {
            &report.new_videos
        };
        let selected: Vec<_> = candidates.iter().take(max_videos).collect();

        let options = SummaryOptions {
            max_length: self.settings.summarize.max_length,
            style,
            model: None,
        };

        let mut summaries = Vec::new();
        for video in &selected {
            let transcript = match fetcher.fetch(&video.video_id).await {
                Ok(t) => t,
                Err(e) => {
                    warn!("Skipping {}: {}", video.video_id, e);
                    continue;
                }
            };
            match summarizer.summarize(&transcript, &options).await {
                Ok(summary) => summaries.push(json!({
                    "channel": video.channel_title,
                    "title": video.video_title,
                    "url": video.video_url,
                    "published": video.published_at,
                    "summary": summary,
                })),
                Err(e) => warn!("Summarizing {} failed: {}", video.video_id, e),
            }
        }

        ToolCallResult::json(&json!({
            "channels_processed": report.successful_channels,
            "videos_found": selected.len(),
            "summaries_generated": summaries.len(),
            "summaries": summaries,
        }))
    }

    /// Health check tool.
    fn tool_health_check(&self) -> ToolCallResult {
        ToolCallResult::json(&json!({
            "status": "healthy",
            "server_name": SERVER_NAME,
            "server_version": SERVER_VERSION,
            "apis_configured": {
                "openai_api_key": crate::openai::api_key_configured(),
                "youtube_api_key": self.settings.youtube.resolve_api_key().is_some(),
            },
        }))
    }
}

/// Extract and validate the `channels` argument shared by the monitor tools.
fn channel_list_from(args: Option<&Value>) -> std::result::Result<Vec<String>, String> {
    let channels = args
        .and_then(|a| a.get("channels"))
        .and_then(|c| c.as_array())
        .ok_or_else(|| "Missing 'channels' argument".to_string())?;

    let channels: Vec<String> = channels
        .iter()
        .filter_map(|c| c.as_str())
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if channels.is_empty() {
        return Err("At least one channel is required".to_string());
    }

    Ok(channels)
}

fn summary_options_from(args: &Value, settings: &Settings) -> SummaryOptions {
    SummaryOptions {
        max_length: args
            .get("max_length")
            .and_then(|v| v.as_u64())
            .map(|v| v as u32)
            .unwrap_or(settings.summarize.max_length),
        style: args
            .get("style")
            .and_then(|v| v.as_str())
            .unwrap_or(&settings.summarize.style)
            .to_string(),
        model: args
            .get("model")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_list_validation() {
        assert!(channel_list_from(None).is_err());
        assert!(channel_list_from(Some(&json!({}))).is_err());
        assert!(channel_list_from(Some(&json!({"channels": []}))).is_err());
        assert!(channel_list_from(Some(&json!({"channels": ["", "  "]}))).is_err());

        let channels =
            channel_list_from(Some(&json!({"channels": [" @veritasium ", "UCx"]}))).unwrap();
        assert_eq!(channels, vec!["@veritasium".to_string(), "UCx".to_string()]);
    }

    #[test]
    fn test_summary_options_defaults_from_settings() {
        let settings = Settings::default();
        let options = summary_options_from(&json!({}), &settings);
        assert_eq!(options.max_length, settings.summarize.max_length);
        assert_eq!(options.style, settings.summarize.style);

        let options = summary_options_from(
            &json!({"max_length": 100, "style": "detailed", "model": "gpt-4o"}),
            &settings,
        );
        assert_eq!(options.max_length, 100);
        assert_eq!(options.style, "detailed");
        assert_eq!(options.model.as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn test_unknown_method_is_rejected() {
        let mut server = McpServer::new(Settings::default());
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"bogus"}"#).unwrap();
        let response = server.handle_request(request).await;
        assert!(response.error.is_some());
    }

    #[tokio::test]
    async fn test_tools_list_includes_monitor_tool() {
        let mut server = McpServer::new(Settings::default());
        let request: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).unwrap();
        let response = server.handle_request(request).await;
        let result = response.result.unwrap();
        let names: Vec<&str> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert!(names.contains(&"youtube_channels_monitor"));
        assert!(names.contains(&"health_check"));
    }
}

//! MCP tool definitions for Vakt.

use super::protocol::Tool;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "youtube_transcribe".to_string(),
            description: "Extract the transcript of a YouTube video from its caption tracks. \
                Provide either a video URL or a bare 11-character video ID."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "YouTube video URL (e.g. https://www.youtube.com/watch?v=VIDEO_ID)"
                    },
                    "video_id": {
                        "type": "string",
                        "description": "YouTube video ID (11 characters)"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "summarize_text".to_string(),
            description: "Summarize text into a readable article using an LLM."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Text to summarize"
                    },
                    "max_length": {
                        "type": "integer",
                        "description": "Maximum length of the summary in words",
                        "default": 500
                    },
                    "style": {
                        "type": "string",
                        "description": "Summary style: concise, detailed, or bullet_points",
                        "default": "concise"
                    },
                    "model": {
                        "type": "string",
                        "description": "Model override (defaults to the configured model)"
                    }
                },
                "required": ["text"]
            }),
        },
        Tool {
            name: "youtube_channels_monitor".to_string(),
            description: "Monitor YouTube channels for new videos. Accepts channel URLs, \
                @handles, or channel IDs, and reports each channel's latest video with an \
                is_new flag based on what was seen on previous calls."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channels": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Channel URLs, handles, or IDs to check"
                    }
                },
                "required": ["channels"]
            }),
        },
        Tool {
            name: "youtube_channel_latest".to_string(),
            description: "Get the latest video from a single YouTube channel."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channel": {
                        "type": "string",
                        "description": "Channel URL, handle, or ID"
                    }
                },
                "required": ["channel"]
            }),
        },
        Tool {
            name: "youtube_summarize_latest".to_string(),
            description: "Check channels for their latest videos, fetch transcripts, and \
                return a summary per video. New videos are preferred; videos without \
                transcripts are skipped."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "channels": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Channel URLs, handles, or IDs to check"
                    },
                    "max_videos": {
                        "type": "integer",
                        "description": "Maximum number of videos to summarize",
                        "default": 5
                    },
                    "style": {
                        "type": "string",
                        "description": "Summary style for the transcripts",
                        "default": "concise"
                    }
                },
                "required": ["channels"]
            }),
        },
        Tool {
            name: "health_check".to_string(),
            description: "Check server health and which API keys are configured."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

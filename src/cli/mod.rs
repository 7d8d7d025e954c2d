//! CLI module for Vakt.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Vakt - YouTube Channel Monitoring and Summarization
///
/// A CLI tool for watching YouTube channels, fetching transcripts, and
/// summarizing videos. The name "Vakt" comes from the Norwegian word for
/// "watch" or "guard."
#[derive(Parser, Debug)]
#[command(name = "vakt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check channels for new videos since the last run
    Monitor {
        /// Channel URLs, @handles, or channel IDs
        #[arg(required = true)]
        channels: Vec<String>,

        /// Print the full report as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show the latest video from a single channel
    Latest {
        /// Channel URL, @handle, or channel ID
        channel: String,

        /// Print the result as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Fetch the transcript of a video
    Transcribe {
        /// YouTube video URL or 11-character video ID
        input: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize text from a file (or stdin with "-")
    Summarize {
        /// Path to a text file, or "-" to read from stdin
        input: String,

        /// Maximum length of the summary in words
        #[arg(long, default_value = "500")]
        max_length: u32,

        /// Summary style (concise, detailed, bullet_points)
        #[arg(short, long, default_value = "concise")]
        style: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check channels and summarize their latest videos in one pass
    Digest {
        /// Channel URLs, @handles, or channel IDs
        #[arg(required = true)]
        channels: Vec<String>,

        /// Maximum number of videos to summarize
        #[arg(long, default_value = "5")]
        max_videos: usize,

        /// Summary style (concise, detailed, bullet_points)
        #[arg(short, long, default_value = "concise")]
        style: String,
    },

    /// Check API keys and configuration
    Doctor,

    /// Start MCP server for AI assistant integration (Claude, etc.)
    Mcp,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

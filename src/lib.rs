//! Vakt - YouTube channel monitoring and summarization tools
//!
//! A CLI tool and MCP server for watching YouTube channels, fetching video
//! transcripts, and turning them into readable summaries.
//!
//! The name "Vakt" comes from the Norwegian word for "watch" or "guard."
//!
//! # Overview
//!
//! Vakt allows you to:
//! - Monitor a list of YouTube channels and detect newly published videos
//! - Fetch video transcripts without downloading any media
//! - Summarize transcripts (or arbitrary text) into article-style digests
//! - Expose all of the above as MCP tools for AI assistants
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `state` - Durable monitoring state (resolution cache, last-seen videos)
//! - `youtube` - YouTube Data API client and transcript fetching
//! - `monitor` - Channel resolution and freshness tracking
//! - `summarize` - LLM-based text summarization
//! - `mcp` - MCP server (JSON-RPC 2.0 over stdio)
//!
//! # Example
//!
//! ```rust,no_run
//! use vakt::config::Settings;
//! use vakt::monitor::ChannelMonitor;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut monitor = ChannelMonitor::from_settings(&settings).await?;
//!
//!     let refs = vec!["https://www.youtube.com/@veritasium".to_string()];
//!     let report = monitor.monitor(&refs).await?;
//!     println!("{} new video(s)", report.new_videos.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod monitor;
pub mod openai;
pub mod state;
pub mod summarize;
pub mod youtube;

pub use error::{Result, VaktError};

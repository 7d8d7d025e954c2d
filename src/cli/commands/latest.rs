//! Latest command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::monitor::ChannelMonitor;
use anyhow::Result;

/// Show the latest video for a single channel.
pub async fn run_latest(channel: &str, json: bool, settings: Settings) -> Result<()> {
    let mut monitor = ChannelMonitor::from_settings(&settings).await?;
    let video = monitor.latest(channel).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&video)?);
        return Ok(());
    }

    Output::header(&video.channel_title);
    println!();
    Output::kv("Title", &video.video_title);
    Output::kv("URL", &video.video_url);
    if let Some(published) = &video.published_at {
        Output::kv("Published", &published.to_rfc3339());
    }
    Output::kv("New since last check", if video.is_new { "yes" } else { "no" });
    if !video.video_description.is_empty() {
        println!();
        println!("{}", video.video_description);
    }

    Ok(())
}

//! Monitor command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::monitor::{BatchStatus, ChannelMonitor};
use anyhow::Result;

/// Run a monitoring batch over the given channels.
pub async fn run_monitor(channels: &[String], json: bool, settings: Settings) -> Result<()> {
    let mut monitor = ChannelMonitor::from_settings(&settings).await?;
    let report = monitor.monitor(channels).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    Output::header("Channel Monitor");
    println!();

    for video in &report.videos {
        Output::video(video);
    }

    if !report.errors.is_empty() {
        println!();
        for err in &report.errors {
            Output::warning(&format!("{}: {}", err.channel, err.error));
        }
    }

    println!();
    match report.status {
        BatchStatus::Success => Output::success(&format!(
            "{} channel(s) checked, {} new video(s).",
            report.successful_channels,
            report.new_videos.len()
        )),
        BatchStatus::Partial => Output::warning(&format!(
            "{}/{} channel(s) checked, {} new video(s), {} error(s).",
            report.successful_channels,
            report.total_channels,
            report.new_videos.len(),
            report.errors.len()
        )),
        BatchStatus::Failed => Output::error("All channels failed."),
    }

    if let Some(state_error) = &report.state_error {
        Output::warning(&format!(
            "State could not be saved, these videos will be reported again: {}",
            state_error
        ));
    }

    Ok(())
}

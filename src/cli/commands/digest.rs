//! Digest command - monitor channels and summarize their latest videos.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::monitor::ChannelMonitor;
use crate::summarize::{Summarizer, SummaryOptions};
use crate::youtube::TranscriptFetcher;
use anyhow::Result;
use console::style;

/// Check channels and print a summary per video.
pub async fn run_digest(
    channels: &[String],
    max_videos: usize,
    summary_style: &str,
    settings: Settings,
) -> Result<()> {
    let mut monitor = ChannelMonitor::from_settings(&settings).await?;
    let fetcher = TranscriptFetcher::new(&settings.youtube.transcript_language);
    let summarizer = Summarizer::new(&settings.summarize).with_prompts(Prompts::load(None)?);

    Output::info(&format!("Checking {} channel(s)...", channels.len()));
    let report = monitor.monitor(channels).await?;

    for err in &report.errors {
        Output::warning(&format!("{}: {}", err.channel, err.error));
    }

    // New videos first; if nothing is new, fall back to the latest of each.
    let candidates = if report.new_videos.is_empty() {
        if !report.videos.is_empty() {
            Output::info("No new videos, summarizing the latest from each channel.");
        }
        &report.videos
    } else {
        &report.new_videos
    };

    if candidates.is_empty() {
        Output::warning("Nothing to summarize.");
        return Ok(());
    }

    let options = SummaryOptions {
        max_length: settings.summarize.max_length,
        style: summary_style.to_string(),
        model: None,
    };

    let mut summarized = 0;
    for video in candidates.iter().take(max_videos) {
        println!(
            "\n{} {} {}",
            style(">>").green().bold(),
            style(&video.channel_title).bold(),
            style(&video.video_title).cyan()
        );
        println!("   {}", style(&video.video_url).dim());

        let transcript = match fetcher.fetch(&video.video_id).await {
            Ok(t) => t,
            Err(e) => {
                Output::warning(&format!("Skipping: {}", e));
                continue;
            }
        };

        match summarizer.summarize(&transcript, &options).await {
            Ok(summary) => {
                println!("\n{}", summary);
                summarized += 1;
            }
            Err(e) => Output::warning(&format!("Summarization failed: {}", e)),
        }
    }

    println!();
    Output::success(&format!(
        "Summarized {} of {} video(s).",
        summarized,
        candidates.len().min(max_videos)
    ));

    if let Some(state_error) = &report.state_error {
        Output::warning(&format!("State could not be saved: {}", state_error));
    }

    Ok(())
}

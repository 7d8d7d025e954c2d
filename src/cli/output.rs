//! CLI output formatting utilities.

use crate::monitor::LatestVideo;
use console::style;

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a video entry from a monitoring report.
    pub fn video(video: &LatestVideo) {
        let marker = if video.is_new {
            style("NEW").green().bold().to_string()
        } else {
            style("   ").dim().to_string()
        };
        println!(
            "  {} {} {}",
            marker,
            style(&video.channel_title).bold(),
            style(&video.video_title).cyan()
        );
        if let Some(published) = &video.published_at {
            println!("        {}", style(published.to_rfc3339()).dim());
        }
        println!("        {}", style(&video.video_url).dim());
    }
}

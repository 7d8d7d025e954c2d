//! Vakt CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vakt::cli::{commands, Cli, Commands};
use vakt::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vakt={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Monitor { channels, json } => {
            commands::run_monitor(channels, *json, settings).await?;
        }

        Commands::Latest { channel, json } => {
            commands::run_latest(channel, *json, settings).await?;
        }

        Commands::Transcribe { input, output } => {
            commands::run_transcribe(input, output.clone(), settings).await?;
        }

        Commands::Summarize {
            input,
            max_length,
            style,
            model,
        } => {
            commands::run_summarize(input, *max_length, style, model.clone(), settings).await?;
        }

        Commands::Digest {
            channels,
            max_videos,
            style,
        } => {
            commands::run_digest(channels, *max_videos, style, settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}

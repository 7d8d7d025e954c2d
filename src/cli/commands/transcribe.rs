//! Transcribe command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{extract_video_id, TranscriptFetcher};
use anyhow::Result;

/// Fetch and print (or save) a video transcript.
pub async fn run_transcribe(input: &str, output: Option<String>, settings: Settings) -> Result<()> {
    let video_id = extract_video_id(input)?;
    let fetcher = TranscriptFetcher::new(&settings.youtube.transcript_language);

    Output::info(&format!("Fetching transcript for {}...", video_id));
    let transcript = fetcher.fetch(&video_id).await?;

    match output {
        Some(path) => {
            std::fs::write(&path, &transcript)?;
            Output::success(&format!(
                "Saved {} chars to {}",
                transcript.len(),
                path
            ));
        }
        None => {
            println!("{}", transcript);
        }
    }

    Ok(())
}

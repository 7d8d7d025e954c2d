//! Summarize command implementation.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::summarize::{Summarizer, SummaryOptions};
use anyhow::Result;
use std::io::Read;

/// Summarize text from a file or stdin.
pub async fn run_summarize(
    input: &str,
    max_length: u32,
    style: &str,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    let summarizer = Summarizer::new(&settings.summarize).with_prompts(Prompts::load(None)?);
    let options = SummaryOptions {
        max_length,
        style: style.to_string(),
        model,
    };

    Output::info(&format!("Summarizing {} chars...", text.len()));
    let summary = summarizer.summarize(&text, &options).await?;

    println!("\n{}", summary);
    Ok(())
}

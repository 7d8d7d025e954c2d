//! Configuration module for Vakt.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, SummaryPrompts};
pub use settings::{
    GeneralSettings, Settings, StateBackend, StateSettings, SummarizeSettings, YoutubeSettings,
};

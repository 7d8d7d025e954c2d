//! LLM-based text summarization.
//!
//! Turns raw text (usually a video transcript) into an article-style
//! summary using an OpenAI chat model.

use crate::config::{Prompts, SummarizeSettings};
use crate::error::{Result, VaktError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Per-request summarization options.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Maximum length of the summary in words.
    pub max_length: u32,
    /// Summary style (concise, detailed, bullet_points).
    pub style: String,
    /// Model override; the configured default applies when None.
    pub model: Option<String>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            max_length: 500,
            style: "concise".to_string(),
            model: None,
        }
    }
}

/// Summarization engine.
pub struct Summarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    default_model: String,
    prompts: Prompts,
}

impl Summarizer {
    /// Create a summarizer with the configured default model.
    pub fn new(settings: &SummarizeSettings) -> Self {
        Self {
            client: create_client(),
            default_model: settings.model.clone(),
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Summarize a piece of text into an article.
    #[instrument(skip(self, text), fields(chars = text.len(), style = %options.style))]
    pub async fn summarize(&self, text: &str, options: &SummaryOptions) -> Result<String> {
        if text.trim().is_empty() {
            return Err(VaktError::InvalidInput(
                "Text to summarize must be a non-empty string".to_string(),
            ));
        }

        let model = options.model.as_deref().unwrap_or(&self.default_model);
        info!("Summarizing {} chars with {}", text.len(), model);

        let mut vars = HashMap::new();
        vars.insert("max_length".to_string(), options.max_length.to_string());
        vars.insert("style".to_string(), options.style.clone());
        let instructions = Prompts::render(&self.prompts.summary.system, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instructions)
                .build()
                .map_err(|e| VaktError::Summarize(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(text.to_string())
                .build()
                .map_err(|e| VaktError::Summarize(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()
            .map_err(|e| VaktError::Summarize(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VaktError::OpenAI(format!("Summary generation failed: {}", e)))?;

        let article = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| VaktError::Summarize("Model returned an empty article".to_string()))?;

        debug!("Generated article of {} chars", article.len());
        Ok(article)
    }
}

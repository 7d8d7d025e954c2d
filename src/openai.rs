//! OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (2 minutes).
///
/// Summaries of long transcripts can take a while; anything beyond this
/// is treated as a hung call.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with the default request timeout.
pub fn create_client() -> Client<OpenAIConfig> {
    create_client_with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}

/// Whether an OpenAI API key is present in the environment.
pub fn api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty())
}

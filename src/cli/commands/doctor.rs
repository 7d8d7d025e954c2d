//! Doctor command - verify API keys and configuration.

use crate::cli::Output;
use crate::config::{Settings, StateBackend};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Vakt Doctor");
    println!();
    println!("Checking API keys and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let youtube_check = check_youtube_api_key(settings);
    youtube_check.print();
    checks.push(youtube_check);
    let openai_check = check_openai_api_key();
    openai_check.print();
    checks.push(openai_check);

    println!();

    println!("{}", style("State Store").bold());
    let state_checks = check_state_store(settings);
    for check in &state_checks {
        check.print();
    }
    checks.extend(state_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Vakt.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Vakt is ready to use.");
    }

    Ok(())
}

/// Check if the YouTube Data API key is configured.
fn check_youtube_api_key(settings: &Settings) -> CheckResult {
    match settings.youtube.resolve_api_key() {
        Some(key) if key.len() > 10 => {
            CheckResult::ok(
                "YouTube API key",
                &format!("configured ({})", mask_key(&key, 4)),
            )
        }
        Some(_) => CheckResult::warning(
            "YouTube API key",
            "set but looks too short",
            "Expected a YouTube Data API v3 key",
        ),
        None => CheckResult::error(
            "YouTube API key",
            "not set",
            "Set with: export YOUTUBE_API_KEY='...' (or youtube.api_key in config)",
        ),
    }
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            CheckResult::ok(
                "OPENAI_API_KEY",
                &format!("configured ({})", mask_key(&key, 7)),
            )
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "not set (summarization unavailable)",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Mask a key for display, keeping the first `head` and last 4 characters.
fn mask_key(key: &str, head: usize) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= head + 4 {
        return "*".repeat(chars.len());
    }
    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", start, end)
}

/// Check the configured state store.
fn check_state_store(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match settings.state.backend {
        StateBackend::Local => {
            let path = settings.state_file_path();
            if path.exists() {
                results.push(CheckResult::ok(
                    "State file",
                    &format!("{}", path.display()),
                ));
            } else {
                results.push(CheckResult::warning(
                    "State file",
                    &format!("{} (not created yet)", path.display()),
                    "Created on the first monitoring run",
                ));
            }
        }
        StateBackend::Http => {
            if settings.state.http_base_url.is_empty() {
                results.push(CheckResult::error(
                    "HTTP state store",
                    "backend is 'http' but state.http_base_url is not set",
                    "Set state.http_base_url in the config file",
                ));
            } else {
                results.push(CheckResult::ok(
                    "HTTP state store",
                    &format!(
                        "{}/{}/{}",
                        settings.state.http_base_url.trim_end_matches('/'),
                        settings.state.http_container,
                        settings.state.http_object
                    ),
                ));
                if settings.state.resolve_token().is_none() {
                    results.push(CheckResult::warning(
                        "State store token",
                        "not set",
                        "Set with: export VAKT_STATE_TOKEN='...' if the store requires auth",
                    ));
                }
            }
        }
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vakt config edit",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask_key_is_char_boundary_safe() {
        assert_eq!(mask_key("sk-abcdefghijklmnop1234", 7), "sk-abcd...1234");
        assert_eq!(mask_key("short", 4), "*****");
        // Multibyte values must not panic on a char boundary.
        assert_eq!(mask_key("æøåæøåæøåæøå", 4), "æøåæ...åæøå");
    }

    #[test]
    fn test_http_backend_without_base_url_is_an_error() {
        let mut settings = Settings::default();
        settings.state.backend = StateBackend::Http;
        settings.state.http_base_url = String::new();
        let results = check_state_store(&settings);
        assert!(results.iter().any(|r| r.status == CheckStatus::Error));
    }
}

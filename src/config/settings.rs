//! Configuration settings for Vakt.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub summarize: SummarizeSettings,
    pub state: StateSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.vakt".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key. Falls back to the YOUTUBE_API_KEY env var.
    pub api_key: Option<String>,
    /// Base URL of the YouTube Data API.
    pub api_base_url: String,
    /// Preferred transcript language code.
    pub transcript_language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            transcript_language: "en".to_string(),
        }
    }
}

impl YoutubeSettings {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeSettings {
    /// LLM model for summary generation.
    pub model: String,
    /// Default maximum summary length in words.
    pub max_length: u32,
    /// Default summary style (concise, detailed, bullet_points).
    pub style: String,
}

impl Default for SummarizeSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_length: 500,
            style: "concise".to_string(),
        }
    }
}

/// Monitoring state storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    /// Local JSON file (default).
    #[default]
    Local,
    /// Remote object store over HTTP.
    Http,
}

impl std::str::FromStr for StateBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "file" => Ok(StateBackend::Local),
            "http" | "object" => Ok(StateBackend::Http),
            _ => Err(format!("Unknown state backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateBackend::Local => write!(f, "local"),
            StateBackend::Http => write!(f, "http"),
        }
    }
}

/// Monitoring state storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Storage backend (local, http).
    pub backend: StateBackend,
    /// Path to the state file (for the local backend).
    pub file_path: String,
    /// Base URL of the object store (for the http backend).
    pub http_base_url: String,
    /// Container holding the state object (for the http backend).
    pub http_container: String,
    /// Name of the state object (for the http backend).
    pub http_object: String,
    /// Bearer token for the object store. Falls back to VAKT_STATE_TOKEN.
    pub http_token: Option<String>,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            backend: StateBackend::Local,
            file_path: "~/.vakt/monitor_state.json".to_string(),
            http_base_url: String::new(),
            http_container: "vakt-monitor".to_string(),
            http_object: "monitor_state.json".to_string(),
            http_token: None,
        }
    }
}

impl StateSettings {
    /// Resolve the object store token from config or environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.http_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var("VAKT_STATE_TOKEN").ok().filter(|t| !t.is_empty()))
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VaktError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vakt")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded state file path.
    pub fn state_file_path(&self) -> PathBuf {
        Self::expand_path(&self.state.file_path)
    }
}

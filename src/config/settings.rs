//! Configuration settings for Scout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when `openai.api_key` is not set.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub agent: AgentSettings,
    pub server: ServerSettings,
    pub tools: ToolSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Remote model credentials and client options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// API key for the Chat Completions API.
    pub api_key: Option<String>,
    /// Chat model used by the research agent.
    pub model: String,
    /// Request timeout for model calls, in seconds.
    pub timeout_seconds: u64,
    /// Alternative API base URL (OpenAI-compatible servers).
    pub base_url: Option<String>,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            timeout_seconds: 300,
            base_url: None,
        }
    }
}

/// Tool-use loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum number of model rounds before the loop gives up.
    pub max_tool_rounds: usize,
    /// Sampling temperature. None leaves the provider default.
    pub temperature: Option<f32>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            temperature: None,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Settings shared by the tool adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// File overwritten by the save tool.
    pub output_file: String,
    /// Timeout for search and Wikipedia requests, in seconds.
    pub timeout_seconds: u64,
    /// Number of Wikipedia pages summarized per lookup.
    pub wikipedia_top_k: usize,
    /// Maximum characters returned by a Wikipedia lookup.
    pub wikipedia_chars_max: usize,
    /// User agent sent with outbound tool requests.
    pub user_agent: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            output_file: "output.txt".to_string(),
            timeout_seconds: 30,
            wikipedia_top_k: 1,
            wikipedia_chars_max: 100,
            user_agent: concat!("scout/", env!("CARGO_PKG_VERSION")).to_string(),
        }
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
            Some(p) => {
                if !p.exists() {
                    return Err(crate::error::ScoutError::Config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                p.clone()
            }
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Settings::default())
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the default configuration file path.
    ///
    /// A `scout.toml` in the working directory wins over the per-user file.
    pub fn default_config_path() -> PathBuf {
        let local = PathBuf::from("scout.toml");
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scout")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output file path for the save tool.
    pub fn output_file(&self) -> PathBuf {
        Self::expand_path(&self.tools.output_file)
    }

    /// Resolve the API key from the config file, then the environment.
    pub fn api_key(&self) -> Option<String> {
        self.openai
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    /// Like [`Settings::api_key`], but missing credentials are a configuration error.
    pub fn require_api_key(&self) -> crate::error::Result<String> {
        self.api_key().ok_or_else(|| {
            crate::error::ScoutError::Config(format!(
                "No API key configured. Set [openai] api_key in {} or export {}",
                Self::default_config_path().display(),
                API_KEY_ENV
            ))
        })
    }

    /// Mask a secret, keeping the first and last four characters.
    pub fn mask_key(key: &str) -> String {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
    }
}

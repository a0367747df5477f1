//! Configuration management for synapse.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for at startup
pub const CONFIG_FILE_NAME: &str = "synapse.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Connection settings for the reasoning oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSettings {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Value for the HTTP-Referer header
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Value for the X-Title header
    #[serde(default = "default_title")]
    pub title: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Sampling temperature (provider default if unset)
    #[serde(default)]
    pub temperature: Option<f32>,
}

/// Settings for the reasoning loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Maximum reasoner turns before the run is aborted
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_model() -> String {
    "google/gemini-flash-1.5".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_referer() -> String {
    "http://localhost".to_string()
}

fn default_title() -> String {
    "Project Synapse".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_steps() -> usize {
    25
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            referer: default_referer(),
            title: default_title(),
            request_timeout_secs: default_request_timeout_secs(),
            temperature: None,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

impl Config {
    /// Load synapse.toml from the current directory or a parent, falling back to defaults
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("{} not found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if config.agent.max_steps == 0 {
            bail!("{}: agent.max_steps must be at least 1", path.display());
        }
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Find synapse.toml by searching current directory and parents
    pub fn find_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_config_path_from(current)
    }

    fn find_config_path_from(mut current: PathBuf) -> Option<PathBuf> {
        for _ in 0..10 {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }
        None
    }
}

impl OracleSettings {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        let key = std::env::var(&self.api_key_env).with_context(|| {
            format!(
                "Environment variable {} is not set (needed for the oracle API key)",
                self.api_key_env
            )
        })?;

        if key.trim().is_empty() {
            bail!("Environment variable {} is empty", self.api_key_env);
        }
        Ok(key)
    }

    /// Full chat-completions endpoint
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

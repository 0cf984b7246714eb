//! Configuration loading, validation, and management for ChatMirror.
//!
//! Loads configuration from `~/.chatmirror/config.toml` with environment
//! variable overrides. Validates all settings at startup. The configuration
//! is immutable once loaded — the widget runtime only ever reads it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chatmirror_core::Role;

/// One message of a prompt variant. The content is a *template* — it may
/// contain `{{variable}}` markers that the widget resolves at assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

/// One alternative conversation seed: an ordered sequence of messages.
pub type PromptVariant = Vec<PromptMessage>;

/// The root configuration structure.
///
/// Maps directly to `~/.chatmirror/config.toml`. Interval fields are in
/// seconds, matching the file surface; use the `Duration` accessors from code.
#[derive(Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Seconds between successful fetches
    #[serde(default = "default_update_interval")]
    pub update_interval: u64,

    /// Seconds to wait before retrying a failed fetch
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Seconds to wait before the very first fetch
    #[serde(default)]
    pub initial_delay: u64,

    /// Seconds the display transition is allowed to take
    #[serde(default = "default_animation_speed")]
    pub animation_speed: f64,

    /// Text shown before the first successful response
    #[serde(default = "default_loading_placeholder")]
    pub loading_placeholder: String,

    /// Model identifier sent in the request payload
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key (secret; redacted in Debug output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_time_out")]
    pub time_out: u64,

    /// Prompt variants; one is chosen uniformly at random per fetch.
    /// Must be non-empty for polling to run.
    #[serde(default)]
    pub prompts: Vec<PromptVariant>,

    /// Fixed messages always prepended before the chosen variant
    #[serde(default)]
    pub initial_prompt: Vec<PromptMessage>,

    /// Display styling, passed through to the render surface
    #[serde(default)]
    pub style: StyleConfig,
}

fn default_update_interval() -> u64 {
    900
}
fn default_retry_delay() -> u64 {
    1
}
fn default_animation_speed() -> f64 {
    1.0
}
fn default_loading_placeholder() -> String {
    "Loading...".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}
fn default_time_out() -> u64 {
    5
}

/// Display styling options. Opaque to the runtime; the render host applies
/// whichever of these its medium supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub font_url: String,

    #[serde(default)]
    pub font_size: String,

    #[serde(default)]
    pub font_style: String,

    #[serde(default)]
    pub color: String,

    #[serde(default = "default_class_name")]
    pub class_name: String,
}

fn default_class_name() -> String {
    "light small".into()
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_url: String::new(),
            font_size: String::new(),
            font_style: String::new(),
            color: String::new(),
            class_name: default_class_name(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("update_interval", &self.update_interval)
            .field("retry_delay", &self.retry_delay)
            .field("initial_delay", &self.initial_delay)
            .field("animation_speed", &self.animation_speed)
            .field("loading_placeholder", &self.loading_placeholder)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("time_out", &self.time_out)
            .field("prompts", &self.prompts)
            .field("initial_prompt", &self.initial_prompt)
            .field("style", &self.style)
            .finish()
    }
}

impl WidgetConfig {
    /// Load configuration from the default path (~/.chatmirror/config.toml).
    ///
    /// Also checks environment variables:
    /// - `CHATMIRROR_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `CHATMIRROR_MODEL` overrides the model
    /// - `CHATMIRROR_ENDPOINT` overrides the endpoint URL
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from a specific path, applying environment variable overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CHATMIRROR_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("CHATMIRROR_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("CHATMIRROR_ENDPOINT") {
            config.endpoint = endpoint;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chatmirror")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prompts.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one prompt variant must be configured".into(),
            ));
        }

        if self.prompts.iter().any(|variant| variant.is_empty()) {
            return Err(ConfigError::ValidationError(
                "prompt variants must contain at least one message".into(),
            ));
        }

        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "endpoint must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if a non-empty API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay)
    }

    pub fn animation_speed(&self) -> Duration {
        Duration::from_secs_f64(self.animation_speed.max(0.0))
    }

    pub fn time_out(&self) -> Duration {
        Duration::from_secs(self.time_out)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            update_interval: default_update_interval(),
            retry_delay: default_retry_delay(),
            initial_delay: 0,
            animation_speed: default_animation_speed(),
            loading_placeholder: default_loading_placeholder(),
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: None,
            time_out: default_time_out(),
            prompts: vec![],
            initial_prompt: vec![],
            style: StyleConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

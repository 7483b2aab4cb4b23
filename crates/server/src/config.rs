//! # Application Configuration
//!
//! This module defines the configuration structure for the `supportpilot-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::LazyLock;
use supportpilot::{
    constants::{DEFAULT_DB_FILE, DEFAULT_FALLBACK_REPLY, DEFAULT_MAX_KNOWLEDGE_RECORDS},
    providers::ai::gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_URL},
};
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub grounding: GroundingConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    9090
}

/// Provides a default value for the `db_url` field if not set in the environment.
fn default_db_url() -> String {
    DEFAULT_DB_FILE.to_string()
}

/// The generation provider.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider ("gemini" or "local").
    #[serde(default = "default_provider_kind")]
    pub provider: String,
    /// The API URL. Defaults to the public Gemini endpoint; required for "local".
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key. A blank value counts as absent.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

fn default_provider_kind() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider_kind(),
            api_url: None,
            api_key: None,
            model_name: None,
        }
    }
}

impl ProviderConfig {
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| GEMINI_API_URL.to_string())
    }

    pub fn resolved_model_name(&self) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
    }
}

/// Controls how the knowledge base is placed into the prompt.
#[derive(Debug, Deserialize, Clone)]
pub struct GroundingConfig {
    /// Largest knowledge base sent to the provider. `0` disables the limit.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
    /// Replaces the built-in grounding prompt. Must keep every placeholder.
    #[serde(default)]
    pub prompt_template: Option<String>,
}

fn default_max_records() -> usize {
    DEFAULT_MAX_KNOWLEDGE_RECORDS
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            prompt_template: None,
        }
    }
}

impl GroundingConfig {
    pub fn record_limit(&self) -> Option<usize> {
        (self.max_records > 0).then_some(self.max_records)
    }
}

/// User-facing texts produced by the server.
#[derive(Debug, Deserialize, Clone)]
pub struct MessagesConfig {
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,
}

fn default_fallback_reply() -> String {
    DEFAULT_FALLBACK_REPLY.to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            fallback_reply: default_fallback_reply(),
        }
    }
}

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("env placeholder pattern is valid")
});

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_PLACEHOLDER.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - An explicit `config_path_override` must exist. Without one, `config.yml` next to
///   the server crate is used if present, otherwise built-in defaults.
/// - Top-level keys like `port` and `db_url` are overridden by `PORT` and `DB_URL`.
/// - Nested keys are overridden by `SUPPORTPILOT_...` variables
///   (e.g., `SUPPORTPILOT_PROVIDER__MODEL_NAME`).
/// - A missing or blank API key falls back to the `AI_API_KEY` variable.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("port", i64::from(default_port()))?
        .set_default("db_url", default_db_url())?;

    // Layer 2: Main config file.
    let main_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let user_config_path = format!("{base_path}/config.yml");
            let content = read_and_substitute(&user_config_path)?;
            match &content {
                Some(_) => info!("Loading configuration from '{user_config_path}'."),
                None => info!("'{user_config_path}' not found. Using built-in defaults."),
            }
            content
        }
    };
    if let Some(content) = main_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("SUPPORTPILOT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    // Deserialize the fully resolved configuration into our `AppConfig` struct.
    let mut config: AppConfig = settings.try_deserialize()?;

    // `${AI_API_KEY}` expands to an empty string when the variable is unset.
    config.provider.api_key = config
        .provider
        .api_key
        .take()
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env::var("AI_API_KEY").ok().filter(|k| !k.trim().is_empty()));

    Ok(config)
}

use client::ClientConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const ENV_PREFIX: &str = "SUBTRACK";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(
        "Configuration loading failed: {0}. Please check your config.toml file and environment variables."
    )]
    Load(String),

    #[error("Failed to deserialize config: {0}")]
    Deserialize(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default = "ClientConfig::from_env")]
    api: ClientConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Some("warn".to_string()),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency")]
    currency: String,
    #[serde(default = "default_top")]
    top: usize,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_top() -> usize {
    client::dashboard::DashboardSummary::DEFAULT_TOP
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            top: default_top(),
        }
    }
}

impl AppConfig {
    pub fn api(&self) -> &ClientConfig {
        &self.api
    }
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("warn")
    }
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }
}

impl DisplayConfig {
    pub fn currency(&self) -> &str {
        &self.currency
    }
    pub fn top(&self) -> usize {
        self.top
    }
}

/// Loads `config.toml` (or `path`) overlaid with `SUBTRACK__SECTION__KEY`
/// environment variables, after reading `.env`.
///
/// API settings absent from both fall back to `SUBTRACK_API_BASE_URL`,
/// `SUBTRACK_CREDENTIALS_FILE` and `SUBTRACK_USER_AGENT`.
///
/// The default file is optional; an explicitly given one must exist.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigLoadError> {
    dotenv::dotenv().ok();
    load_config_with_prefix(path, ENV_PREFIX)
}

pub fn load_config_with_prefix(
    path: Option<&Path>,
    env_prefix: &str,
) -> Result<AppConfig, ConfigLoadError> {
    let file_source = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(CONFIG_FILE_NAME).required(false),
    };
    let env_source = Environment::with_prefix(env_prefix).separator("__");

    let config = Config::builder()
        .add_source(file_source)
        .add_source(env_source)
        .build()
        .map_err(|e| ConfigLoadError::Load(e.to_string()))?;

    let app_config = config
        .try_deserialize::<AppConfig>()
        .map_err(|e| ConfigLoadError::Deserialize(e.to_string()))?;

    app_config
        .api
        .validate()
        .map_err(|e| ConfigLoadError::Deserialize(e.to_string()))?;
    Ok(app_config)
}

use crate::common::ClientError;
use crate::utils::EnvUtils;
use reqwest::Url;
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const BASE_URL_ENV: &str = "SUBTRACK_API_BASE_URL";
pub const CREDENTIALS_FILE_ENV: &str = "SUBTRACK_CREDENTIALS_FILE";
pub const USER_AGENT_ENV: &str = "SUBTRACK_USER_AGENT";

const APP_DIR_NAME: &str = "subtrack";
const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Connection settings for [`ApiClient`](crate::http::ApiClient).
///
/// Request paths are appended verbatim to `base_url`, so the base URL carries
/// any API prefix (for example `https://example.com/api`) and the paths keep
/// their trailing slashes.
///
/// Fields missing from a deserialized config fall back to the same
/// environment variables [`ClientConfig::from_env`] reads.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "env_base_url")]
    base_url: String,
    #[serde(default = "env_credentials_file")]
    credentials_file: Option<PathBuf>,
    #[serde(default = "env_user_agent")]
    user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn env_base_url() -> String {
    EnvUtils::get_optional_var(BASE_URL_ENV).unwrap_or_else(default_base_url)
}

fn env_credentials_file() -> Option<PathBuf> {
    EnvUtils::get_optional_path(CREDENTIALS_FILE_ENV)
}

fn env_user_agent() -> Option<String> {
    EnvUtils::get_optional_var(USER_AGENT_ENV)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials_file: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Builds a config from `SUBTRACK_API_BASE_URL`, `SUBTRACK_CREDENTIALS_FILE`
    /// and `SUBTRACK_USER_AGENT`, falling back to defaults for unset values.
    pub fn from_env() -> Self {
        Self {
            base_url: env_base_url(),
            credentials_file: env_credentials_file(),
            user_agent: env_user_agent(),
        }
    }

    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("subtrack-client/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Explicit credentials file, or `<data dir>/subtrack/credentials.json`.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_file.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(CREDENTIALS_FILE_NAME))
        })
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(self.base_url()).map_err(|e| {
            ClientError::Configuration(format!("Invalid API base URL '{}': {e}", self.base_url))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ClientError::Configuration(format!(
                "API base URL must use http or https, got '{scheme}'"
            ))),
        }
    }
}

//! Validated access to the environment variables the client reads.
//!
//! Values are trimmed; a variable holding only whitespace counts as unset.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading environment variables.
#[derive(Debug, Error, PartialEq)]
pub enum EnvVarError {
    #[error(
        "Environment variable '{name}' not found. Please set this variable in your .env file or environment."
    )]
    NotFound { name: String },

    #[error(
        "Environment variable '{name}' contains invalid UTF-8 characters. Please check the value."
    )]
    InvalidUtf8 { name: String },

    #[error("Environment variable '{name}' is empty. Please provide a valid value.")]
    Empty { name: String },
}

/// Environment variable helpers.
///
/// # Examples
///
/// ```no_run
/// use client::utils::EnvUtils;
///
/// let base_url = EnvUtils::get_optional_var("SUBTRACK_API_BASE_URL")
///     .unwrap_or_else(|| "http://localhost:8000/api".to_string());
/// let credentials = EnvUtils::get_optional_path("SUBTRACK_CREDENTIALS_FILE");
/// ```
pub struct EnvUtils;

impl EnvUtils {
    /// Returns the trimmed value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvVarError`] if the variable is unset, empty after trimming,
    /// or not valid UTF-8.
    pub fn get_validated_var(name: &str) -> Result<String, EnvVarError> {
        match std::env::var(name) {
            Ok(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Err(EnvVarError::Empty {
                        name: name.to_string(),
                    })
                } else {
                    Ok(trimmed.to_string())
                }
            }
            Err(std::env::VarError::NotPresent) => Err(EnvVarError::NotFound {
                name: name.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(EnvVarError::InvalidUtf8 {
                name: name.to_string(),
            }),
        }
    }

    pub fn get_optional_var(name: &str) -> Option<String> {
        Self::get_validated_var(name).ok()
    }

    /// Interprets `name` as a filesystem path, expanding a leading `~/`
    /// against the user's home directory.
    pub fn get_optional_path(name: &str) -> Option<PathBuf> {
        let raw = Self::get_optional_var(name)?;
        match (raw.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(PathBuf::from(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name so parallel tests do not race.

    #[test]
    fn test_missing_var_is_not_found() {
        let name = "SUBTRACK_TEST_ENV_MISSING";
        assert_eq!(
            EnvUtils::get_validated_var(name),
            Err(EnvVarError::NotFound {
                name: name.to_string()
            })
        );
        assert_eq!(EnvUtils::get_optional_path(name), None);
    }

    #[test]
    fn test_whitespace_var_is_empty() {
        let name = "SUBTRACK_TEST_ENV_BLANK";
        unsafe { std::env::set_var(name, "   ") };
        assert_eq!(
            EnvUtils::get_validated_var(name),
            Err(EnvVarError::Empty {
                name: name.to_string()
            })
        );
        assert_eq!(EnvUtils::get_optional_var(name), None);
    }

    #[test]
    fn test_value_is_trimmed() {
        let name = "SUBTRACK_TEST_ENV_TRIMMED";
        unsafe { std::env::set_var(name, "  http://localhost:8000/api \n") };
        assert_eq!(
            EnvUtils::get_optional_var(name).as_deref(),
            Some("http://localhost:8000/api")
        );
    }

    #[test]
    fn test_path_expands_home() {
        let name = "SUBTRACK_TEST_ENV_PATH";
        unsafe { std::env::set_var(name, "~/subtrack/credentials.json") };
        let path = EnvUtils::get_optional_path(name).unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("subtrack/credentials.json"));
        }

        unsafe { std::env::set_var(name, "/var/lib/subtrack.json") };
        assert_eq!(
            EnvUtils::get_optional_path(name),
            Some(PathBuf::from("/var/lib/subtrack.json"))
        );
    }
}

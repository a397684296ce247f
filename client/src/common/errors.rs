use crate::validation::ValidationErrors;
use serde_json::Value;
use thiserror::Error;

/// Error returned by the backend for any non-success HTTP response.
///
/// This is the one error shape the UI layer needs to special-case. It is
/// produced after the refresh/retry sequence has finished, so a 401 seen here
/// means the session could not be recovered.
///
/// # Fields
/// - `message`: Human-readable message extracted from the response
/// - `status`: HTTP status code of the final response
/// - `data`: Parsed JSON error body, or the raw text body when it was not JSON
///
/// # Examples
///
/// ```no_run
/// use client::common::{ApiError, ClientError};
///
/// fn report(error: &ClientError) {
///     match error.as_api_error() {
///         Some(api) if api.is_unauthorized() => println!("Please log in again"),
///         Some(api) => {
///             for (field, message) in api.field_errors() {
///                 println!("{field}: {message}");
///             }
///         }
///         None => eprintln!("Unexpected failure: {error}"),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub data: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16, data: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status,
            data,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }

    /// Flattens a field-keyed error payload into `(field, message)` pairs.
    ///
    /// The backend reports validation failures as `{"field": ["msg", ...]}`
    /// or `{"field": "msg"}`. Non-string entries are skipped. A payload that
    /// is not a JSON object yields no pairs.
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Some(Value::Object(fields)) = &self.data else {
            return Vec::new();
        };

        let mut pairs = Vec::new();
        for (field, value) in fields {
            match value {
                Value::String(message) => pairs.push((field.clone(), message.clone())),
                Value::Array(messages) => pairs.extend(
                    messages
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|message| (field.clone(), message.to_string())),
                ),
                _ => {}
            }
        }
        pairs
    }
}

/// Reasons a token refresh can fail.
///
/// Cloned to every request waiting on the same refresh, so all of them
/// observe the identical outcome.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefreshError {
    #[error("No refresh token stored")]
    MissingRefreshToken,

    #[error("Refresh token rejected by the server (HTTP {status})")]
    Rejected { status: u16 },

    #[error("Network error during token refresh: {reason}")]
    NetworkError { reason: String },

    #[error("Invalid token refresh response: {reason}")]
    InvalidResponse { reason: String },

    #[error("Failed to read refresh token: {reason}")]
    Storage { reason: String },

    #[error("Token refresh was abandoned before it completed")]
    Abandoned,
}

impl RefreshError {
    /// Whether this failure means the stored session is unusable and must be
    /// torn down.
    pub fn invalidates_session(&self) -> bool {
        matches!(
            self,
            RefreshError::Rejected { .. }
                | RefreshError::NetworkError { .. }
                | RefreshError::InvalidResponse { .. }
        )
    }
}

/// Credential storage failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Credential file I/O failed for {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Credential file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by every client operation.
///
/// # Error Categories
///
/// - [`Api`] - The backend answered with a non-success status
/// - [`Transport`] - The request could not be sent or its body not read
/// - [`Decode`] - A success body did not match the expected record
/// - [`Storage`] - The credential store failed
/// - [`Configuration`] - The client was configured with invalid values
/// - [`Validation`] - A subscription draft failed client-side checks
///
/// [`Api`]: ClientError::Api
/// [`Transport`]: ClientError::Transport
/// [`Decode`]: ClientError::Decode
/// [`Storage`]: ClientError::Storage
/// [`Configuration`]: ClientError::Configuration
/// [`Validation`]: ClientError::Validation
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl ClientError {
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(api) => Some(api),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.as_api_error().is_some_and(ApiError::is_unauthorized)
    }
}

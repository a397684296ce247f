use crate::api::paths;
use crate::common::RefreshError;
use crate::model::{RefreshRequest, RefreshResponse};
use async_trait::async_trait;

/// Exchanges a refresh token for a new access token.
///
/// [`HttpTokenRefresher`] calls the backend; tests substitute their own
/// implementation to control timing and failures.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Returns the new access token.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::Rejected`] when the server refuses the refresh
    /// token, [`RefreshError::NetworkError`] when the call itself fails and
    /// [`RefreshError::InvalidResponse`] when the reply cannot be read.
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError>;
}

/// Calls the session refresh endpoint.
#[derive(Clone, Debug)]
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    url: String,
}

impl HttpTokenRefresher {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), paths::TOKEN_REFRESH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let response = self
            .http
            .post(&self.url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await
            .map_err(|e| RefreshError::NetworkError {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Refresh endpoint answered HTTP {}", status.as_u16());
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
            });
        }

        let mut body: RefreshResponse =
            response
                .json()
                .await
                .map_err(|e| RefreshError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        if body.access.is_empty() {
            return Err(RefreshError::InvalidResponse {
                reason: "empty access token".to_string(),
            });
        }

        Ok(std::mem::take(&mut body.access))
    }
}

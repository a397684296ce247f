use super::request::RequestOptions;
use super::response::{extract_api_error, is_json, parse_success};
use crate::api::{Auth, Subscriptions};
use crate::auth::{HttpTokenRefresher, SessionManager, TokenRefresher};
use crate::common::ClientError;
use crate::config::ClientConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// HTTP client for the subtrack backend.
///
/// Cloning is cheap; clones share the connection pool and the session, and
/// therefore also share refresh coordination.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionManager>,
    refresher: Arc<dyn TokenRefresher>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client refreshing tokens against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Configuration`] if the base URL is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Result<Self, ClientError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        let refresher = Arc::new(HttpTokenRefresher::new(http.clone(), config.base_url()));

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session,
            refresher,
        })
    }

    /// Replaces the component used to exchange refresh tokens.
    pub fn with_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = refresher;
        self
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn subscriptions(&self) -> Subscriptions<'_> {
        Subscriptions::new(self)
    }

    /// Sends a request to `path` and returns the decoded JSON body, if any.
    ///
    /// A `401` to a request that carried an access token triggers a token
    /// refresh followed by exactly one retry with the new token. If the
    /// refresh fails the original `401` is reported.
    ///
    /// # Errors
    ///
    /// [`ClientError::Api`] for any non-success final response,
    /// [`ClientError::Transport`] when the request cannot be sent,
    /// [`ClientError::Decode`] when a JSON success body does not parse and
    /// [`ClientError::Storage`] when the access token cannot be read.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, ClientError> {
        let url = self.url(path);
        let token = self.session.access_token().await?;

        let mut response = self.send(&url, &options, token.as_deref()).await?;

        if let Some(sent) = token.as_deref() {
            if response.status() == StatusCode::UNAUTHORIZED {
                log::debug!("{} {} answered 401, refreshing session", options.method, path);
                match self
                    .session
                    .refresh_access_token(sent, self.refresher.as_ref())
                    .await
                {
                    Ok(fresh) => {
                        response = self.send(&url, &options, Some(&fresh)).await?;
                    }
                    Err(e) => {
                        log::debug!("Not retrying {} {}: {e}", options.method, path);
                    }
                }
            }
        }

        Self::read_body(&url, response).await
    }

    /// Like [`request`](Self::request), decoding the body into `T`.
    ///
    /// An empty body is decoded from JSON `null`, so `T = Option<_>` accepts
    /// it while record types report [`ClientError::Decode`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let value = self.request(path, options).await?.unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(|e| ClientError::Decode {
            url: self.url(path),
            reason: e.to_string(),
        })
    }

    /// Sends `body` as JSON with `method` and decodes the response into `T`.
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::new(method).with_json(body)?;
        self.request_json(path, options).await
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut headers: HeaderMap = options.headers.clone();
        headers.remove(AUTHORIZATION);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ClientError::Transport {
                    url: url.to_string(),
                    reason: "stored access token is not a valid header value".to_string(),
                }
            })?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        let mut builder = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        builder.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<Option<Value>, ClientError> {
        let status = response.status();
        let json = is_json(response.headers());
        let body = response.text().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            let error = extract_api_error(status, json, &body);
            log::debug!("{url} failed with HTTP {}: {}", error.status, error.message);
            return Err(error.into());
        }

        parse_success(json, &body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

use super::paths;
use crate::common::ClientError;
use crate::http::{ApiClient, RequestOptions};
use crate::model::{AuthTokens, LoginRequest, RegisterRequest, User};
use crate::validation::{PasswordValidator, Validator};
use reqwest::Method;

/// Authentication endpoints, obtained with [`ApiClient::auth`].
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a token pair and stores it.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let tokens: AuthTokens = self
            .client
            .send_json(Method::POST, paths::TOKEN_CREATE, &request)
            .await?;

        self.client.session().store_credentials(&tokens).await?;
        log::info!("Logged in as {username}");
        Ok(())
    }

    /// Creates an account. Does not log in.
    ///
    /// The password is checked against [`PasswordValidator`] first.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        PasswordValidator.validate(password)?;
        let request = RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        let user: User = self
            .client
            .send_json(Method::POST, paths::REGISTER, &request)
            .await?;
        log::info!("Registered user {}", user.username);
        Ok(user)
    }

    /// The logged-in user. A `401` here means the session is gone.
    pub async fn me(&self) -> Result<User, ClientError> {
        self.client
            .request_json(paths::ME, RequestOptions::get())
            .await
    }

    /// Forgets both stored tokens. No request is sent.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.client.session().clear().await?;
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated().await
    }
}

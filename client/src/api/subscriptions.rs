use super::paths;
use crate::common::ClientError;
use crate::http::{ApiClient, RequestOptions};
use crate::model::{Subscription, SubscriptionDraft, SubscriptionStats};
use crate::validation::{DraftValidator, Validator};
use reqwest::Method;

/// Subscription endpoints, obtained with [`ApiClient::subscriptions`].
///
/// Drafts are validated locally before they are sent; a failing draft
/// returns [`ClientError::Validation`] without a request.
pub struct Subscriptions<'a> {
    client: &'a ApiClient,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Lists the user's subscriptions, active ones only unless
    /// `include_inactive` is set.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Subscription>, ClientError> {
        let path = paths::with_inactive(paths::SUBSCRIPTIONS, include_inactive);
        self.client.request_json(&path, RequestOptions::get()).await
    }

    pub async fn get(&self, id: u64) -> Result<Subscription, ClientError> {
        self.client
            .request_json(&paths::subscription(id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, draft: &SubscriptionDraft) -> Result<Subscription, ClientError> {
        DraftValidator::for_create().validate(draft)?;
        let created: Subscription = self
            .client
            .send_json(Method::POST, paths::SUBSCRIPTIONS, draft)
            .await?;
        log::info!("Created subscription {} ({})", created.id, created.service_name);
        Ok(created)
    }

    /// Applies `draft` as a partial update.
    ///
    /// The current record is fetched first so the draft can be validated
    /// against the values it does not change.
    pub async fn update(
        &self,
        id: u64,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, ClientError> {
        let existing = self.get(id).await?;
        DraftValidator::for_update(&existing).validate(draft)?;

        let updated: Subscription = self
            .client
            .send_json(Method::PATCH, &paths::subscription(id), draft)
            .await?;
        log::info!("Updated subscription {id}");
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), ClientError> {
        self.client
            .request(&paths::subscription(id), RequestOptions::delete())
            .await?;
        log::info!("Deleted subscription {id}");
        Ok(())
    }

    pub async fn stats(&self, include_inactive: bool) -> Result<SubscriptionStats, ClientError> {
        let path = paths::with_inactive(paths::SUBSCRIPTION_STATS, include_inactive);
        self.client.request_json(&path, RequestOptions::get()).await
    }
}

use super::credential_store::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY};
use super::refresher::TokenRefresher;
use crate::common::{RefreshError, StorageError};
use crate::model::AuthTokens;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use zeroize::Zeroizing;

/// Session lifecycle notifications delivered to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Credentials were stored after a successful login
    LoggedIn,
    /// The access token was replaced by a refresh
    Refreshed,
    /// The refresh token was rejected or unreachable; credentials are gone
    /// and the user has to log in again
    Invalidated(RefreshError),
    /// Credentials were cleared on request
    LoggedOut,
}

/// Callback for session lifecycle events
pub type SessionEventCallback = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

type RefreshOutcome = Result<String, RefreshError>;

// Refresh coordination state. Only touched synchronously, never across an
// await point.
#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    subscribers: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Owns the stored credentials and coordinates access-token refreshes.
///
/// At most one refresh call is outstanding per manager. A request that hits
/// an expired access token while a refresh is running subscribes to that
/// refresh and receives the same outcome as every other waiter, in the order
/// they subscribed.
///
/// # Examples
///
/// ```no_run
/// use client::auth::{MemoryCredentialStore, SessionEvent, SessionManager};
/// use std::sync::Arc;
///
/// let session = SessionManager::new(Arc::new(MemoryCredentialStore::new()))
///     .with_event_callback(Arc::new(|event: &SessionEvent| {
///         if let SessionEvent::Invalidated(reason) = event {
///             eprintln!("Session expired ({reason}), please log in again");
///         }
///     }));
/// ```
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    refresh_state: Mutex<RefreshState>,
    event_callback: Option<SessionEventCallback>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            refresh_state: Mutex::new(RefreshState::default()),
            event_callback: None,
        }
    }

    /// Set a callback invoked on every [`SessionEvent`]
    pub fn with_event_callback(mut self, callback: SessionEventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub async fn access_token(&self) -> Result<Option<String>, StorageError> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }

    /// Whether an access token is stored. Says nothing about its validity;
    /// use the current-user endpoint for that.
    pub async fn is_authenticated(&self) -> bool {
        match self.access_token().await {
            Ok(token) => token.is_some(),
            Err(e) => {
                log::warn!("Unable to read credentials: {e}");
                false
            }
        }
    }

    pub async fn store_credentials(&self, tokens: &AuthTokens) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, &tokens.access).await?;
        self.store.set(REFRESH_TOKEN_KEY, &tokens.refresh).await?;
        log::info!("Session credentials stored");
        self.emit(&SessionEvent::LoggedIn);
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.clear().await?;
        log::info!("Session credentials cleared");
        self.emit(&SessionEvent::LoggedOut);
        Ok(())
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Obtains a replacement for `rejected_token`, the access token a request
    /// was just refused with.
    ///
    /// The first caller runs the refresh; callers arriving while it is in
    /// flight wait for its result instead of starting another one.
    ///
    /// # Errors
    ///
    /// Returns the [`RefreshError`] of the shared refresh. When the refresh
    /// token was rejected or the refresh endpoint was unreachable, both
    /// credentials are cleared and [`SessionEvent::Invalidated`] is emitted
    /// once, by the caller that ran the refresh.
    pub async fn refresh_access_token(
        &self,
        rejected_token: &str,
        refresher: &dyn TokenRefresher,
    ) -> Result<String, RefreshError> {
        let waiter = {
            let mut state = self.lock_state();
            if state.in_flight {
                let (tx, rx) = oneshot::channel();
                state.subscribers.push(tx);
                Some(rx)
            } else {
                state.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            log::debug!("Token refresh already in flight, waiting for its result");
            return rx.await.unwrap_or(Err(RefreshError::Abandoned));
        }

        let guard = InFlightGuard {
            state: &self.refresh_state,
            armed: true,
        };
        let outcome = self.run_refresh(rejected_token, refresher).await;
        guard.finish(&outcome);
        outcome
    }

    async fn run_refresh(
        &self,
        rejected_token: &str,
        refresher: &dyn TokenRefresher,
    ) -> RefreshOutcome {
        // A refresh that finished between the request and its 401 already
        // replaced the token.
        if let Ok(Some(current)) = self.access_token().await {
            if current != rejected_token {
                log::debug!("Access token already replaced, skipping refresh");
                return Ok(current);
            }
        }

        let refresh_token = match self.store.get(REFRESH_TOKEN_KEY).await {
            Ok(Some(token)) => Zeroizing::new(token),
            Ok(None) => {
                log::debug!("No refresh token stored, cannot refresh session");
                return Err(RefreshError::MissingRefreshToken);
            }
            Err(e) => {
                return Err(RefreshError::Storage {
                    reason: e.to_string(),
                });
            }
        };

        log::info!("Access token expired, refreshing session");
        match refresher.refresh(&refresh_token).await {
            Ok(access) => {
                if let Err(e) = self.store.set(ACCESS_TOKEN_KEY, &access).await {
                    log::warn!("Refreshed access token could not be persisted: {e}");
                }
                log::info!("Session refreshed");
                self.emit(&SessionEvent::Refreshed);
                Ok(access)
            }
            Err(e) => {
                if e.invalidates_session() {
                    self.invalidate(&e).await;
                } else {
                    log::warn!("Token refresh failed: {e}");
                }
                Err(e)
            }
        }
    }

    async fn invalidate(&self, reason: &RefreshError) {
        log::warn!("Session invalidated: {reason}");
        if let Err(e) = self.store.clear().await {
            log::error!("Failed to clear credentials after refresh failure: {e}");
        }
        self.emit(&SessionEvent::Invalidated(reason.clone()));
    }

    fn emit(&self, event: &SessionEvent) {
        if let Some(callback) = &self.event_callback {
            callback(event);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.refresh_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// Resets the in-flight flag even when the refreshing future is dropped, so
// waiters are woken (with `Abandoned`) instead of hanging.
struct InFlightGuard<'a> {
    state: &'a Mutex<RefreshState>,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn take_subscribers(&self) -> Vec<oneshot::Sender<RefreshOutcome>> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = false;
        std::mem::take(&mut state.subscribers)
    }

    fn finish(mut self, outcome: &RefreshOutcome) {
        self.armed = false;
        let subscribers = self.take_subscribers();
        if !subscribers.is_empty() {
            log::debug!(
                "Delivering refresh outcome to {} waiting request(s)",
                subscribers.len()
            );
        }
        for subscriber in subscribers {
            // the waiter may have been dropped
            let _ = subscriber.send(outcome.clone());
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            drop(self.take_subscribers());
        }
    }
}

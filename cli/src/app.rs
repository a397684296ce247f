use crate::config::AppConfig;
use anyhow::{Result, anyhow};
use client::auth::{FileCredentialStore, SessionEvent, SessionManager};
use client::ApiClient;
use std::sync::Arc;

pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired. Please log in again with `subtrack login`.";

/// Reaction to session lifecycle events: an invalidated session sends the
/// user back to the login command.
pub fn on_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::Invalidated(reason) => {
            log::warn!("Session invalidated: {reason}");
            eprintln!("{SESSION_EXPIRED_MESSAGE}");
        }
        SessionEvent::Refreshed => log::debug!("Session refreshed"),
        SessionEvent::LoggedIn | SessionEvent::LoggedOut => {}
    }
}

/// Builds the API client with a file-backed session.
pub fn build_client(config: &AppConfig) -> Result<ApiClient> {
    let path = config.api().credentials_path().ok_or_else(|| {
        anyhow!("Cannot determine a data directory; set api.credentials_file in config.toml")
    })?;
    log::debug!("Using credentials file {}", path.display());

    let session = SessionManager::new(Arc::new(FileCredentialStore::new(path)))
        .with_event_callback(Arc::new(on_session_event));
    Ok(ApiClient::new(config.api(), Arc::new(session))?)
}

pub mod credential_store;
pub mod refresher;
pub mod session;

pub use credential_store::{
    ACCESS_TOKEN_KEY, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    REFRESH_TOKEN_KEY,
};
pub use refresher::{HttpTokenRefresher, TokenRefresher};
pub use session::{SessionEvent, SessionEventCallback, SessionManager};

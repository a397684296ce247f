//! Typed wrappers over the backend endpoints.

pub mod auth;
pub mod subscriptions;

pub use auth::Auth;
pub use subscriptions::Subscriptions;

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    pub const TOKEN_CREATE: &str = "/auth/jwt/create/";
    pub const TOKEN_REFRESH: &str = "/auth/jwt/refresh/";
    pub const REGISTER: &str = "/auth/register/";
    pub const ME: &str = "/auth/me/";
    pub const SUBSCRIPTIONS: &str = "/subscriptions/";
    pub const SUBSCRIPTION_STATS: &str = "/subscriptions/stats/";

    pub fn subscription(id: u64) -> String {
        format!("{SUBSCRIPTIONS}{id}/")
    }

    /// Appends the inactive-records switch understood by the list and stats
    /// endpoints.
    pub fn with_inactive(path: &str, include_inactive: bool) -> String {
        if include_inactive {
            format!("{path}?include_inactive=1")
        } else {
            path.to_string()
        }
    }
}

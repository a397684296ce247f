//! Typed records for the backend payloads.
//!
//! - [`auth`] - login, registration and token exchange bodies
//! - [`subscription`] - subscription records, drafts and aggregate stats

pub mod auth;
pub(crate) mod decimal;
pub mod subscription;

pub use auth::{AuthTokens, LoginRequest, RefreshRequest, RefreshResponse, RegisterRequest, User};
pub use subscription::{
    BillingCycle, Category, IntervalUnit, Subscription, SubscriptionDraft, SubscriptionStats,
};

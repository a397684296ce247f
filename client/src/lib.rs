//! # Subtrack Client Library
//!
//! Core library for talking to the subtrack REST backend. It provides an
//! authenticated HTTP client with transparent access-token refresh, typed
//! endpoint wrappers for authentication and subscription management, and the
//! client-side billing math used for display and sorting.
//!
//! ## Modules
//!
//! - [`auth`] - Credential storage, session state and token refresh
//! - [`http`] - Authenticated request pipeline and response handling
//! - [`api`] - Typed wrappers for the auth and subscription endpoints
//! - [`model`] - Backend payload records
//! - [`billing`] - Cost normalization and renewal date math
//! - [`validation`] - Client-side checks for subscription drafts
//! - [`dashboard`] - Aggregations behind the dashboard view
//! - [`config`] - Client configuration
//! - [`common`] - Shared error types
//! - [`utils`] - Utility functions and helpers

pub mod api;
pub mod auth;
pub mod billing;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod model;
pub mod utils;
pub mod validation;

pub use auth::{SessionEvent, SessionManager};
pub use common::{ApiError, ClientError};
pub use config::ClientConfig;
pub use http::{ApiClient, RequestOptions};

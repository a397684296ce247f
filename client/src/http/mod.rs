//! Authenticated request pipeline.
//!
//! [`ApiClient`] attaches the stored access token to every request. A `401`
//! answered to a request that carried a token triggers one coordinated token
//! refresh (see [`SessionManager`](crate::auth::SessionManager)) and a single
//! retry of the original request.

pub mod client;
pub mod request;
pub mod response;

pub use client::ApiClient;
pub use request::RequestOptions;

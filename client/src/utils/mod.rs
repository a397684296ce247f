//! Utility helpers shared across the client.
//!
//! - [`env`] - validated environment variable access used by
//!   [`ClientConfig::from_env`](crate::config::ClientConfig::from_env)

pub mod env;

pub use env::{EnvUtils, EnvVarError};

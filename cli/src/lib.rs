//! # Subtrack CLI
//!
//! Command-line front end for the subtrack backend, built on the
//! [`client`] library.
//!
//! - [`commands`] - Argument parsing and command execution
//! - [`config`] - `config.toml` and environment configuration
//! - [`logger`] - Log output setup
//! - [`render`] - Terminal output formatting
//! - [`app`] - Client construction and session event handling

pub mod app;
pub mod commands;
pub mod config;
pub mod logger;
pub mod render;

//! Command-line tool for the Payletter payment gateway.
//!
//! # Modules
//!
//! - [`commands`] — Clap argument definitions and command execution
//! - [`config`] — TOML configuration with environment variable expansion
//! - [`error`] — Command-line error types

pub mod commands;
pub mod config;
pub mod error;

pub use commands::{Cli, Command};
pub use config::CliConfig;
pub use error::CliError;

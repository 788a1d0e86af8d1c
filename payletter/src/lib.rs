//! Async client for the Payletter payment gateway.
//!
//! Wraps the Payletter PG API (auto-pay billing keys, normal payments,
//! cancels, transaction history) and the easy-pay wallet API behind one
//! [`PayletterClient`], plus an offline [`MockGateway`]. Both implement
//! [`PaymentGateway`].
//!
//! ```no_run
//! use payletter::{Credentials, Endpoints, Environment, PayletterClient};
//! use payletter::proto::TransactionListQuery;
//!
//! # async fn run() -> Result<(), payletter::PayletterError> {
//! let client = PayletterClient::try_new(
//!     Credentials::from_env()?,
//!     Endpoints::for_environment(Environment::Test),
//! )?;
//! let page = client
//!     .list_transactions(&TransactionListQuery::for_date("20240101"))
//!     .await?;
//! println!("{} transactions", page.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] — HTTP client (feature: `telemetry` adds tracing spans)
//! - [`config`] — Credentials and base URLs
//! - [`constants`] — Base URLs, endpoint paths, environment variable names
//! - [`error`] — Client error types
//! - [`gateway`] — The [`PaymentGateway`] trait
//! - [`mock`] — Offline gateway

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod mock;

pub use client::PayletterClient;
pub use config::{Credentials, Endpoints, Environment, UnknownEnvironment};
pub use error::PayletterError;
pub use gateway::PaymentGateway;
pub use mock::MockGateway;

/// Re-export of the wire types.
pub use payletter_proto as proto;

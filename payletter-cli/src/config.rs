//! Command-line configuration.
//!
//! Loads merchant credentials from a TOML file with support for environment
//! variable expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "test"
//! client_id = "pay_test"
//! payment_api_key = "$PAYLETTER_PAYMENT_API_KEY"
//! search_api_key = "${PAYLETTER_SEARCH_API_KEY}"
//! ip_addr = "203.0.113.10"
//! timeout_secs = 10
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` — Path to configuration file (default: `payletter.toml`)
//! - `PAYLETTER_ENV` — Override the environment (`production` or `test`)
//! - `PAYLETTER_CLIENT_ID`, `PAYLETTER_PAYMENT_API_KEY`,
//!   `PAYLETTER_SEARCH_API_KEY`, `PAYLETTER_IP_ADDR` — Used for any
//!   credential the file leaves empty or unresolved

use std::path::Path;
use std::time::Duration;

use payletter::constants::{ENV_CLIENT_ID, ENV_IP_ADDR, ENV_PAYMENT_API_KEY, ENV_SEARCH_API_KEY};
use payletter::{Credentials, Endpoints, Environment, PayletterClient, PayletterError};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Default configuration file name.
pub const DEFAULT_CONFIG_PATH: &str = "payletter.toml";

/// Environment variable overriding [`CliConfig::environment`].
pub const ENV_ENVIRONMENT: &str = "PAYLETTER_ENV";

/// Top-level command-line configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Gateway deployment (default: `production`).
    #[serde(default)]
    pub environment: Environment,

    /// Merchant client id.
    #[serde(default)]
    pub client_id: String,

    /// Payment API key.
    #[serde(default)]
    pub payment_api_key: String,

    /// Search API key.
    #[serde(default)]
    pub search_api_key: String,

    /// Merchant server IP address sent with cancels.
    #[serde(default)]
    pub ip_addr: String,

    /// Custom PG API base URL, e.g. for a local stub.
    #[serde(default)]
    pub pg_api_url: Option<String>,

    /// Custom easy-pay API base URL.
    #[serde(default)]
    pub easy_pay_url: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field("ip_addr", &self.ip_addr)
            .field("pg_api_url", &self.pg_api_url)
            .field("easy_pay_url", &self.easy_pay_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl CliConfig {
    /// Loads configuration from a file path.
    ///
    /// A missing file yields the defaults, leaving every credential to the
    /// `PAYLETTER_*` environment variables. `PAYLETTER_ENV` overrides the
    /// file's `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.to_owned(),
                source,
            })?
        } else {
            tracing::debug!(path = %path.display(), "No configuration file, using environment");
            String::new()
        };

        let mut config = Self::from_toml(&content)?;
        config.override_environment(std::env::var(ENV_ENVIRONMENT).ok().as_deref());
        Ok(config)
    }

    /// Replaces `environment` with the value of `PAYLETTER_ENV`, if set.
    /// Unknown names are logged and ignored.
    fn override_environment(&mut self, value: Option<&str>) {
        let Some(value) = value else {
            return;
        };
        match value.parse() {
            Ok(parsed) => self.environment = parsed,
            Err(e) => tracing::warn!("Ignoring {ENV_ENVIRONMENT}: {e}"),
        }
    }

    /// Parses configuration text after expanding environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Toml`] if the expanded text is not valid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(&expand_env_vars(content))?)
    }

    /// Resolves the merchant credentials, falling back to the environment for
    /// anything the file leaves empty.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::MissingConfig`] naming the first credential
    /// found in neither place.
    pub fn credentials(&self) -> Result<Credentials, PayletterError> {
        Ok(Credentials::new(
            resolve(&self.client_id, ENV_CLIENT_ID)?,
            resolve(&self.payment_api_key, ENV_PAYMENT_API_KEY)?,
            resolve(&self.search_api_key, ENV_SEARCH_API_KEY)?,
        )
        .with_ip_addr(resolve(&self.ip_addr, ENV_IP_ADDR).unwrap_or_default()))
    }

    /// Returns the base URLs, honoring the custom URL overrides.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::UrlParse`] if an override is not a valid URL.
    pub fn endpoints(&self) -> Result<Endpoints, PayletterError> {
        let defaults = Endpoints::for_environment(self.environment);
        match (&self.pg_api_url, &self.easy_pay_url) {
            (None, None) => Ok(defaults),
            (pg_api, easy_pay) => Endpoints::try_new(
                pg_api.as_deref().unwrap_or(defaults.pg_api().as_str()),
                easy_pay.as_deref().unwrap_or(defaults.easy_pay().as_str()),
            ),
        }
    }

    /// Builds a client for the configured account.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError`] if the credentials or URLs are unusable.
    pub fn client(&self) -> Result<PayletterClient, PayletterError> {
        let client = PayletterClient::try_new(self.credentials()?, self.endpoints()?)?;
        Ok(match self.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        })
    }
}

/// Returns `value` unless it is empty or an unresolved `$VAR` reference, in
/// which case the environment variable `env` is consulted.
fn resolve(value: &str, env: &'static str) -> Result<String, PayletterError> {
    let value = value.trim();
    if !value.is_empty() && !value.starts_with('$') {
        return Ok(value.to_owned());
    }
    std::env::var(env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(PayletterError::MissingConfig(env))
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables are left as-is.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }

        let mut var_name = String::new();
        while let Some(&c) = chars.peek() {
            if braced {
                if c == '}' {
                    chars.next();
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            var_name.push(c);
            chars.next();
        }

        match std::env::var(&var_name) {
            Ok(val) if !var_name.is_empty() => result.push_str(&val),
            _ => {
                result.push('$');
                if braced {
                    result.push('{');
                }
                result.push_str(&var_name);
                if braced && !var_name.is_empty() {
                    result.push('}');
                }
            }
        }
    }

    result
}

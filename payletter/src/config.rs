//! Merchant credentials and gateway endpoints.
//!
//! A Payletter merchant account has two API keys: the payment key authorizes
//! payment, cancel and easy-pay requests and signs `hash_data`; the search key
//! authorizes read-only lookups (transaction history, registered methods).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    ENV_CLIENT_ID, ENV_IP_ADDR, ENV_PAYMENT_API_KEY, ENV_SEARCH_API_KEY, PRODUCTION_EASY_PAY_URL,
    PRODUCTION_PG_API_URL, TEST_EASY_PAY_URL, TEST_PG_API_URL,
};
use crate::error::PayletterError;

/// Merchant account credentials.
///
/// `Debug` output redacts both API keys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Merchant client id.
    pub client_id: String,
    /// Payment API key.
    pub payment_api_key: String,
    /// Search API key.
    pub search_api_key: String,
    /// Merchant server IP address, sent with cancel requests.
    #[serde(default)]
    pub ip_addr: String,
}

impl Credentials {
    /// Creates credentials without an IP address.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        payment_api_key: impl Into<String>,
        search_api_key: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            payment_api_key: payment_api_key.into(),
            search_api_key: search_api_key.into(),
            ip_addr: String::new(),
        }
    }

    /// Sets the merchant server IP address.
    #[must_use]
    pub fn with_ip_addr(mut self, ip_addr: impl Into<String>) -> Self {
        self.ip_addr = ip_addr.into();
        self
    }

    /// Reads credentials from `PAYLETTER_CLIENT_ID`, `PAYLETTER_PAYMENT_API_KEY`,
    /// `PAYLETTER_SEARCH_API_KEY` and the optional `PAYLETTER_IP_ADDR`.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::MissingConfig`] naming the first required
    /// variable that is unset or empty.
    pub fn from_env() -> Result<Self, PayletterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, PayletterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(PayletterError::MissingConfig(name))
        };
        Ok(Self {
            client_id: required(ENV_CLIENT_ID)?,
            payment_api_key: required(ENV_PAYMENT_API_KEY)?,
            search_api_key: required(ENV_SEARCH_API_KEY)?,
            ip_addr: lookup(ENV_IP_ADDR).unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("payment_api_key", &"<redacted>")
            .field("search_api_key", &"<redacted>")
            .field("ip_addr", &self.ip_addr)
            .finish()
    }
}

/// Gateway deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live gateway.
    #[default]
    Production,
    /// Sandbox gateway.
    Test,
}

/// Error returned when parsing an unknown [`Environment`] name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown Payletter environment: {0}")]
pub struct UnknownEnvironment(String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(Self::Production),
            "test" | "sandbox" => Ok(Self::Test),
            _ => Err(UnknownEnvironment(s.to_owned())),
        }
    }
}

/// Base URLs of the two gateway APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pg_api: Url,
    easy_pay: Url,
}

/// Parses a base URL, normalizing it to exactly one trailing slash so that
/// relative endpoint paths join under it.
fn parse_base(value: &str, context: &'static str) -> Result<Url, PayletterError> {
    let mut normalized = value.trim_end_matches('/').to_owned();
    normalized.push('/');
    Url::parse(&normalized).map_err(|source| PayletterError::UrlParse { context, source })
}

impl Endpoints {
    /// Creates endpoints from custom base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`PayletterError::UrlParse`] if either URL is invalid.
    pub fn try_new(pg_api: &str, easy_pay: &str) -> Result<Self, PayletterError> {
        Ok(Self {
            pg_api: parse_base(pg_api, "Failed to parse PG API base url")?,
            easy_pay: parse_base(easy_pay, "Failed to parse easy-pay base url")?,
        })
    }

    /// Returns the endpoints of a gateway deployment.
    ///
    /// # Panics
    ///
    /// Never in practice: the built-in base URLs are valid.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let (pg_api, easy_pay) = match environment {
            Environment::Production => (PRODUCTION_PG_API_URL, PRODUCTION_EASY_PAY_URL),
            Environment::Test => (TEST_PG_API_URL, TEST_EASY_PAY_URL),
        };
        Self::try_new(pg_api, easy_pay).expect("built-in Payletter URLs are valid")
    }

    /// Returns the PG API base URL.
    #[must_use]
    pub const fn pg_api(&self) -> &Url {
        &self.pg_api
    }

    /// Returns the easy-pay API base URL.
    #[must_use]
    pub const fn easy_pay(&self) -> &Url {
        &self.easy_pay
    }

    pub(crate) fn pg_api_url(&self, path: &'static str) -> Result<Url, PayletterError> {
        join(&self.pg_api, path)
    }

    pub(crate) fn easy_pay_url(&self, path: &'static str) -> Result<Url, PayletterError> {
        join(&self.easy_pay, path)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

fn join(base: &Url, path: &'static str) -> Result<Url, PayletterError> {
    base.join(path).map_err(|source| PayletterError::UrlParse {
        context: "Failed to construct endpoint URL",
        source,
    })
}

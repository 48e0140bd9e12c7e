//! Client configuration.
//!
//! Use the builder methods to customize a default configuration, or load one
//! from the environment:
//!
//! ```ignore
//! use pcloud_core::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url(pcloud_core::config::EU_API_URL)
//!     .with_access_token("token");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// API host for accounts in the US data region.
pub const US_API_URL: &str = "https://api.pcloud.com";
/// API host for accounts in the EU data region.
pub const EU_API_URL: &str = "https://eapi.pcloud.com";

pub const ENV_API_URL: &str = "PCLOUD_API_URL";
pub const ENV_ACCESS_TOKEN: &str = "PCLOUD_ACCESS_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "PCLOUD_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL endpoint names are appended to. A trailing slash is ignored.
    pub base_url: String,
    /// OAuth access token sent as a bearer token.
    pub access_token: Option<String>,
    /// Whole-request timeout. `None` keeps the transport's default.
    #[serde(with = "opt_secs")]
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: US_API_URL.to_string(),
            access_token: None,
            timeout: None,
            user_agent: concat!("pcloud-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `PCLOUD_API_URL`, `PCLOUD_ACCESS_TOKEN` and
    /// `PCLOUD_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL) {
            config = config.with_base_url(&url);
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty()) {
            config.access_token = Some(token);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{ENV_TIMEOUT_SECS} is not a number: {secs}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = self.base_url.trim_end_matches('/');
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }

    /// Full URL of an API method.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}

//! Configuration for the Pixela provider
//!
//! Settings come from a deserialized provider block or from `PIXELA_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use pixela_client::{PixelaClientConfig, DEFAULT_BASE_URL};

use crate::error::{ProviderError, ProviderResult};
use crate::logging::LoggingConfig;

/// Provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Pixela user name
    pub username: String,

    /// Pixela user token
    pub token: String,

    /// URL of the Pixela service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds for each HTTP request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log filter directives, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Emit JSON logs instead of human readable ones
    #[serde(default)]
    pub json_logs: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("log_filter", &self.log_filter)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl ProviderConfig {
    /// Config with credentials and every other setting defaulted
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            log_filter: default_log_filter(),
            json_logs: false,
        }
    }

    /// Load configuration from environment variables
    pub fn load() -> ProviderResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ProviderResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("PIXELA_USERNAME")
            .ok_or_else(|| ProviderError::Configuration("PIXELA_USERNAME is not set".to_string()))?;
        let token = lookup("PIXELA_TOKEN")
            .ok_or_else(|| ProviderError::Configuration("PIXELA_TOKEN is not set".to_string()))?;

        let mut config = Self::new(username, token);

        if let Some(base_url) = lookup("PIXELA_BASE_URL") {
            config.base_url = base_url;
        }

        if let Some(timeout) = lookup("PIXELA_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout.parse::<u64>() {
                config.timeout_secs = timeout;
            } else {
                warn!("Invalid PIXELA_TIMEOUT_SECS value: {}", timeout);
            }
        }

        if let Some(log_filter) = lookup("PIXELA_LOG_FILTER") {
            config.log_filter = log_filter;
        }

        if let Some(json_logs) = lookup("PIXELA_JSON_LOGS") {
            config.json_logs = json_logs.to_lowercase() == "true" || json_logs == "1";
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ProviderResult<()> {
        self.client_config().validate()?;
        Ok(())
    }

    /// Settings for the HTTP client
    pub fn client_config(&self) -> PixelaClientConfig {
        PixelaClientConfig::new(self.username.clone(), self.token.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout_secs(self.timeout_secs)
    }

    /// Settings for the tracing subscriber
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            log_filter: self.log_filter.clone(),
            json: self.json_logs,
        }
    }
}

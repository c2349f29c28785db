//! Configuration for the Pixela client

use pixela_interfaces::{PixelaError, PixelaResult};

/// Public Pixela endpoint
pub const DEFAULT_BASE_URL: &str = "https://pixe.la";

/// Configuration for the Pixela client
#[derive(Clone)]
pub struct PixelaClientConfig {
    /// Pixela user name owning the graphs
    pub username: String,
    /// Secret sent in the `X-USER-TOKEN` header
    pub token: String,
    /// URL of the Pixela service, without trailing slash
    pub base_url: String,
    /// Timeout in seconds for HTTP requests
    pub timeout_secs: u64,
}

impl std::fmt::Debug for PixelaClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelaClientConfig")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl PixelaClientConfig {
    /// Config for the public service with the default timeout
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Point the client at another base URL (used against mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Reject settings that cannot produce a working client
    pub fn validate(&self) -> PixelaResult<()> {
        if self.username.trim().is_empty() {
            return Err(PixelaError::Configuration("username must not be empty".to_string()));
        }
        if self.token.trim().is_empty() {
            return Err(PixelaError::Configuration("token must not be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PixelaError::Configuration(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(PixelaError::Configuration("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PixelaClientConfig::new("alice", "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config =
            PixelaClientConfig::new("alice", "secret").with_base_url("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let err = PixelaClientConfig::new("", "secret").validate().unwrap_err();
        assert!(matches!(err, PixelaError::Configuration(_)));

        let err = PixelaClientConfig::new("alice", " ").validate().unwrap_err();
        assert!(matches!(err, PixelaError::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_bad_url_and_timeout() {
        let config = PixelaClientConfig::new("alice", "secret").with_base_url("pixe.la");
        assert!(config.validate().is_err());

        let config = PixelaClientConfig::new("alice", "secret").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = PixelaClientConfig::new("alice", "very-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("alice"));
    }
}

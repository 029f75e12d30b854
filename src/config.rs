//! Client configuration

use serde::{Deserialize, Serialize};

use crate::errors::{ClientError, Result};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.modernmt.com";

/// Platform name sent with every request
pub const PLATFORM: &str = "modernmt-rust";

/// Platform version sent with every request
pub const PLATFORM_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the ModernMT client
///
/// All configuration is programmatic; there is no config file. The API key
/// is the only required field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    pub platform: String,
    pub platform_version: String,
    /// Optional numeric client id, sent as the `MMT-ApiClient` header
    pub api_client: Option<i64>,
    pub base_url: String,
}

impl ClientConfig {
    /// Create a configuration with the default platform identity
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            platform: PLATFORM.to_string(),
            platform_version: PLATFORM_VERSION.to_string(),
            api_client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a configuration with a custom platform identity
    pub fn with_identity(
        api_key: impl Into<String>,
        platform: impl Into<String>,
        platform_version: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            platform: platform.into(),
            platform_version: platform_version.into(),
            api_client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Load the API key from the `MMT_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("MMT_API_KEY").map_err(|_| ClientError::Config {
            message: "MMT_API_KEY environment variable is required".to_string(),
        })?;

        Ok(Self::new(api_key))
    }

    pub fn with_api_client(mut self, api_client: i64) -> Self {
        self.api_client = Some(api_client);
        self
    }

    /// Override the base URL, mainly useful for testing
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ClientError::Config {
                message: "API key is required".to_string(),
            });
        }

        if self.base_url.is_empty() {
            return Err(ClientError::Config {
                message: "Base URL is required".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::new("test_key");
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.platform, PLATFORM);
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = ClientConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_custom_identity() {
        let config = ClientConfig::with_identity("key", "my-cat-tool", "2.1.0")
            .with_api_client(12345)
            .with_base_url("https://staging.modernmt.com");

        assert_eq!(config.platform, "my-cat-tool");
        assert_eq!(config.api_client, Some(12345));
        assert_eq!(config.base_url, "https://staging.modernmt.com");
    }
}

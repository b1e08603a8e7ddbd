//! Lookup service configuration module

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Which lookup client implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LookupProvider {
    /// In-process mock client for development
    #[default]
    Mock,
    /// HTTP gateway hosting the real lookup service client
    Http,
}

impl std::fmt::Display for LookupProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupProvider::Mock => write!(f, "mock"),
            LookupProvider::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for LookupProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(LookupProvider::Mock),
            "http" | "gateway" => Ok(LookupProvider::Http),
            _ => Err(format!("Invalid lookup provider: {}", s)),
        }
    }
}

/// Lookup service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Lookup client implementation
    #[serde(default)]
    pub provider: LookupProvider,

    /// Base URL of the lookup gateway (required for the http provider)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent to the gateway
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with gateway requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// OTP accepted by the mock provider
    #[serde(default = "default_mock_otp")]
    pub mock_otp: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            provider: LookupProvider::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            mock_otp: default_mock_otp(),
        }
    }
}

impl LookupConfig {
    /// Create an http provider configuration pointing at `base_url`
    pub fn http(base_url: impl Into<String>) -> Self {
        Self {
            provider: LookupProvider::Http,
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Check that the settings are usable for the selected provider
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "lookup.timeout_secs must be greater than zero".to_string(),
            ));
        }

        match self.provider {
            LookupProvider::Mock => {
                if self.mock_otp.is_empty() {
                    return Err(ConfigError::Invalid(
                        "lookup.mock_otp must not be empty".to_string(),
                    ));
                }
            }
            LookupProvider::Http => {
                let base_url = self.base_url.as_deref().unwrap_or_default();
                if base_url.is_empty() {
                    return Err(ConfigError::Invalid(
                        "lookup.base_url is required for the http provider".to_string(),
                    ));
                }
                if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                    return Err(ConfigError::Invalid(format!(
                        "lookup.base_url must be an http(s) URL: {}",
                        base_url
                    )));
                }
            }
        }

        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("caller-lookup/{}", env!("CARGO_PKG_VERSION"))
}

fn default_mock_otp() -> String {
    String::from("123456")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mock_config_is_valid() {
        let config = LookupConfig::default();
        assert_eq!(config.provider, LookupProvider::Mock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_requires_base_url() {
        let config = LookupConfig {
            provider: LookupProvider::Http,
            ..LookupConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = LookupConfig::http("ftp://gateway");
        assert!(config.validate().is_err());

        let config = LookupConfig::http("https://gateway.local");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = LookupConfig {
            timeout_secs: 0,
            ..LookupConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("MOCK".parse::<LookupProvider>().unwrap(), LookupProvider::Mock);
        assert_eq!("gateway".parse::<LookupProvider>().unwrap(), LookupProvider::Http);
        assert!("twilio".parse::<LookupProvider>().is_err());
    }
}

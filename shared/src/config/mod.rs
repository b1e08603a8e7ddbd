//! Configuration module
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `lookup` - Lookup service provider selection and HTTP gateway settings
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `CALLER_LOOKUP__*` environment variables. Environment values are kept
//! as strings so OTPs and keys with leading zeros survive. Without a
//! `logging` section, logging follows the resolved environment.

pub mod environment;
pub mod lookup;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use lookup::{LookupConfig, LookupProvider};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "CALLER_LOOKUP";

/// Separator between nested keys in environment variable overrides
pub const ENV_SEPARATOR: &str = "__";

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "caller-lookup.toml";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(from = "RawAppConfig")]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Lookup service configuration
    pub lookup: LookupConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Configuration as read from file and environment, before defaults are resolved
#[derive(Deserialize)]
struct RawAppConfig {
    #[serde(default = "Environment::from_env")]
    environment: Environment,

    #[serde(default)]
    lookup: LookupConfig,

    logging: Option<LoggingConfig>,
}

impl From<RawAppConfig> for AppConfig {
    fn from(raw: RawAppConfig) -> Self {
        let logging = raw
            .logging
            .unwrap_or_else(|| LoggingConfig::for_environment(raw.environment));
        Self {
            environment: raw.environment,
            lookup: raw.lookup,
            logging,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            lookup: LookupConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the optional file and environment overrides
    ///
    /// A `.env` file is read first if present. When `path` is `None` the
    /// default file name is tried in the working directory; a missing file is
    /// not an error. Lookup settings are validated when the client is built,
    /// after command line overrides are applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let loaded = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()?;

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_mock_provider() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.lookup.provider, LookupProvider::Mock);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_logging_follows_environment_without_logging_section() {
        let config: AppConfig = toml::from_str(
            r#"
            environment = "production"
            "#,
        )
        .unwrap();

        assert!(config.environment.is_production());
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.colored);
    }

    #[test]
    fn test_explicit_logging_section_wins() {
        let config: AppConfig = toml::from_str(
            r#"
            environment = "production"

            [logging]
            level = "debug"
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_overrides_keep_leading_zeros() {
        std::env::set_var("CALLER_LOOKUP__ENVIRONMENT", "production");
        std::env::set_var("CALLER_LOOKUP__LOOKUP__MOCK_OTP", "000000");
        std::env::set_var("CALLER_LOOKUP__LOOKUP__API_KEY", "0012345");

        let result = AppConfig::load(None);

        std::env::remove_var("CALLER_LOOKUP__ENVIRONMENT");
        std::env::remove_var("CALLER_LOOKUP__LOOKUP__MOCK_OTP");
        std::env::remove_var("CALLER_LOOKUP__LOOKUP__API_KEY");

        let config = result.unwrap();
        assert_eq!(config.lookup.mock_otp, "000000");
        assert_eq!(config.lookup.api_key.as_deref(), Some("0012345"));
        assert!(config.environment.is_production());
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            environment = "staging"

            [lookup]
            provider = "http"
            base_url = "http://127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.lookup.provider, LookupProvider::Http);
        assert_eq!(config.lookup.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(config.lookup.timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/caller-lookup.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}

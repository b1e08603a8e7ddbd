//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use cl_shared::config::{AppConfig, LogFormat, LookupProvider};

/// Verify a phone number with an OTP, then look up numbers
#[derive(Debug, Clone, Parser)]
#[command(name = "caller-lookup", version, about)]
pub struct Args {
    /// Configuration file (defaults to ./caller-lookup.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Lookup provider to use (mock or http)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<LookupProvider>,

    /// Base URL of the lookup gateway
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token for the lookup gateway
    #[arg(long, env = "CALLER_LOOKUP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log level or filter directive
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format (pretty, compact or json)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Request an OTP for this number right away
    #[arg(long, value_name = "PHONE")]
    pub phone: Option<String>,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(provider) = self.provider {
            config.lookup.provider = provider;
        }
        if let Some(base_url) = &self.base_url {
            config.lookup.base_url = Some(base_url.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.lookup.api_key = Some(api_key.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

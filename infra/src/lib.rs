//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for CallerLookup. It provides
//! concrete implementations of the lookup service collaborator used by the
//! verification flow.
//!
//! ## Providers
//!
//! - **http**: JSON over HTTP to a lookup gateway hosting the real service client
//! - **mock**: In-process client for development, printing the OTP to the console

use std::sync::Arc;

use cl_core::LookupClient;
use cl_shared::config::{AppConfig, ConfigError, LookupProvider};

/// Lookup client module - HTTP gateway and mock implementations
pub mod lookup;

/// Configuration types used by this crate
pub mod config {
    pub use cl_shared::config::{LookupConfig, LookupProvider};
}

/// Initialize infrastructure services from the application configuration
///
/// Returns the lookup client selected by `config.lookup.provider`.
pub fn initialize(config: &AppConfig) -> Result<Arc<dyn LookupClient>, InfrastructureError> {
    tracing::info!(
        environment = %config.environment,
        provider = %config.lookup.provider,
        "Initializing infrastructure services..."
    );

    config.lookup.validate()?;
    if config.environment.is_production() && config.lookup.provider == LookupProvider::Mock {
        tracing::warn!("Mock lookup provider selected in production, OTPs are printed locally");
    }
    let client = lookup::create_lookup_client(&config.lookup)?;

    tracing::info!(
        provider = client.provider_name(),
        "Infrastructure services initialized successfully"
    );

    Ok(client)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for InfrastructureError {
    fn from(error: ConfigError) -> Self {
        InfrastructureError::Config(error.to_string())
    }
}

//! Lookup Client Module
//!
//! This module provides implementations of the `LookupClient` collaborator.
//!
//! ## Features
//!
//! - **HTTP Gateway**: JSON requests to a gateway hosting the real service client
//! - **Mock Implementation**: Console output for development
//! - **Security**: Phone number and token masking in logs

use std::sync::Arc;

use cl_core::LookupClient;

use crate::config::{LookupConfig, LookupProvider};
use crate::InfrastructureError;

pub mod http_client;
pub mod mock_client;

// Re-export commonly used types
pub use http_client::HttpLookupClient;
pub use mock_client::MockLookupClient;

#[cfg(test)]
mod tests;

/// Create a lookup client based on configuration
///
/// # Arguments
///
/// * `config` - Lookup configuration containing provider settings
///
/// # Returns
///
/// A shared lookup client implementation, or an error if the http provider
/// cannot be built from the given settings
pub fn create_lookup_client(
    config: &LookupConfig,
) -> Result<Arc<dyn LookupClient>, InfrastructureError> {
    match config.provider {
        LookupProvider::Mock => {
            tracing::warn!("Using mock lookup client, no real lookups will be made");
            Ok(Arc::new(MockLookupClient::new(config.mock_otp.clone())))
        }
        LookupProvider::Http => {
            let client = HttpLookupClient::new(config)?;
            Ok(Arc::new(client))
        }
    }
}

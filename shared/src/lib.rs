//! Shared utilities and common types for CallerLookup
//!
//! This crate provides common functionality used across all workspace crates:
//! - Configuration types and the layered configuration loader
//! - Utility functions (phone number masking and soft validation)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, Environment, LogFormat, LoggingConfig, LookupConfig, LookupProvider,
};
pub use utils::phone;

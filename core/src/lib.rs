//! # CallerLookup Core
//!
//! Core flow logic for the phone verification and lookup client.
//! This crate contains the session entity, the verification flow state machine,
//! the lookup collaborator contract, and the error kinds surfaced to callers.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;

//! Verification flow module
//!
//! This module provides the phone verification flow:
//! - OTP request for a phone number
//! - OTP verification yielding the installation id
//! - Single and bulk number lookups once verified
//! - Task dispatch so callers never wait on a remote call inline

mod dispatch;
mod service;

#[cfg(test)]
mod tests;

pub use dispatch::{dispatch, FlowTask};
pub use service::VerificationFlow;

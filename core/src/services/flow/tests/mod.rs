//! Unit tests for the verification flow

#[cfg(test)]
pub mod mocks;
#[cfg(test)]
pub mod dispatch_tests;

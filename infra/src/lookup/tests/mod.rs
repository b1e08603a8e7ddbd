//! Unit tests for lookup module

#[cfg(test)]
pub mod mock_client_tests;

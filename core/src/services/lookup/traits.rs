//! Trait for lookup service integration

use async_trait::async_trait;
use serde_json::Value;

use super::types::{LoginResponse, LookupClientError, LookupResult, VerifyOtpResponse};

/// Lookup service client
#[async_trait]
pub trait LookupClient: Send + Sync {
    /// Ask the service to deliver an OTP to `phone_number`
    async fn login(&self, phone_number: &str) -> Result<LoginResponse, LookupClientError>;

    /// Submit the OTP together with the context returned by `login`
    async fn verify_otp(
        &self,
        phone_number: &str,
        context: &Value,
        otp: &str,
    ) -> Result<VerifyOtpResponse, LookupClientError>;

    /// Look up a single number
    async fn search_phone_number(
        &self,
        phone_number: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError>;

    /// Look up a comma separated list of numbers
    async fn bulk_search(
        &self,
        phone_numbers: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

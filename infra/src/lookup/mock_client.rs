//! Mock Lookup Client Implementation
//!
//! A mock implementation of the lookup service for development and testing.
//! Instead of delivering an OTP it prints the accepted code to the console,
//! and lookups return canned records built from the query.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use cl_core::{LoginResponse, LookupClient, LookupClientError, LookupResult, VerifyOtpResponse};
use cl_shared::phone::{is_valid_international_phone, mask_phone_number};

/// Mock lookup client for development and testing
///
/// This implementation:
/// - Accepts logins for E.164 phone numbers
/// - Accepts exactly one configured OTP
/// - Issues a fresh installation id per verification
/// - Tracks the number of calls for testing
#[derive(Clone)]
pub struct MockLookupClient {
    /// OTP the mock accepts
    accepted_otp: String,
    /// Counter for tracking number of calls made
    call_count: Arc<AtomicU64>,
    /// Whether to simulate transport failures (for testing)
    simulate_failure: bool,
    /// Whether to print the OTP to console
    console_output: bool,
}

impl MockLookupClient {
    /// Create a new mock lookup client accepting `accepted_otp`
    pub fn new(accepted_otp: impl Into<String>) -> Self {
        Self {
            accepted_otp: accepted_otp.into(),
            call_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
            console_output: true,
        }
    }

    /// Create a mock client with configurable options
    pub fn with_options(
        accepted_otp: impl Into<String>,
        console_output: bool,
        simulate_failure: bool,
    ) -> Self {
        Self {
            accepted_otp: accepted_otp.into(),
            call_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of calls made
    pub fn get_call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }

    /// Console banner announcing the accepted OTP, with the number masked
    pub fn otp_banner(&self, phone_number: &str) -> String {
        let rule = "=".repeat(60);
        format!(
            "\n{rule}\nMOCK LOOKUP SERVICE - OTP\n{rule}\nTo: {}\nOTP: {}\n{rule}\n",
            mask_phone_number(phone_number),
            self.accepted_otp,
        )
    }

    fn record_call(&self, operation: &str) -> Result<u64, LookupClientError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        if self.simulate_failure {
            warn!(provider = "mock", operation, "Mock lookup client simulating failure");
            return Err(LookupClientError::Transport(
                "Simulated lookup service failure".to_string(),
            ));
        }
        Ok(count)
    }

    fn profile(phone_number: &str, country_code: &str) -> Value {
        json!({
            "id": format!("mock-{}", phone_number.trim_start_matches('+')),
            "name": "Mock Contact",
            "phones": [{
                "e164Format": phone_number,
                "countryCode": country_code.to_uppercase(),
                "carrier": "Mock Telecom",
                "type": "MOBILE",
            }],
            "spamInfo": { "spamScore": 0 },
        })
    }
}

impl Default for MockLookupClient {
    fn default() -> Self {
        Self::new("123456")
    }
}

#[async_trait]
impl LookupClient for MockLookupClient {
    async fn login(&self, phone_number: &str) -> Result<LoginResponse, LookupClientError> {
        self.record_call("login")?;
        let masked = mask_phone_number(phone_number);

        if !is_valid_international_phone(phone_number) {
            info!(provider = "mock", phone = %masked, "Mock login rejected invalid number");
            return Ok(LoginResponse::new(
                400,
                json!({ "status": 0, "message": "Invalid phone number" }),
            ));
        }

        let request_id = Uuid::new_v4().to_string();

        if self.console_output {
            // Console output for development - show the OTP that will be accepted
            println!("{}", self.otp_banner(phone_number));
        }

        info!(
            provider = "mock",
            phone = %masked,
            request_id = %request_id,
            "Mock OTP issued"
        );

        Ok(LoginResponse::new(
            200,
            json!({
                "status": 1,
                "message": "Sent OTP",
                "requestId": request_id,
                "tokenTtl": 300,
            }),
        ))
    }

    async fn verify_otp(
        &self,
        phone_number: &str,
        _context: &Value,
        otp: &str,
    ) -> Result<VerifyOtpResponse, LookupClientError> {
        self.record_call("verify_otp")?;

        if otp != self.accepted_otp {
            info!(
                provider = "mock",
                phone = %mask_phone_number(phone_number),
                "Mock verification rejected OTP"
            );
            return Ok(VerifyOtpResponse::new(
                400,
                json!({ "status": 11, "message": "Invalid OTP" }),
            ));
        }

        Ok(VerifyOtpResponse::new(
            200,
            json!({
                "status": 2,
                "message": "Verified",
                "installationId": format!("mock-{}", Uuid::new_v4().simple()),
                "ttl": 259200,
            }),
        ))
    }

    async fn search_phone_number(
        &self,
        phone_number: &str,
        country_code: &str,
        _installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        self.record_call("search")?;
        Ok(json!({ "data": [Self::profile(phone_number, country_code)] }))
    }

    async fn bulk_search(
        &self,
        phone_numbers: &str,
        country_code: &str,
        _installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        self.record_call("bulk_search")?;
        let data: Vec<Value> = phone_numbers
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| json!({ "key": n, "value": Self::profile(n, country_code) }))
            .collect();
        Ok(json!({ "data": data }))
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}

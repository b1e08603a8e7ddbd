//! Mock implementations for testing the verification flow

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::Operation;
use crate::services::lookup::{
    LoginResponse, LookupClient, LookupClientError, LookupResult, VerifyOtpResponse,
};

/// A call received by the stub, with the arguments it was given
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Login { phone: String },
    VerifyOtp { phone: String, context: Value, otp: String },
    Search { phone: String, country: String, installation_id: String },
    BulkSearch { phones: String, country: String, installation_id: String },
}

// Deterministic lookup client stub
pub struct StubLookupClient {
    pub login_response: LoginResponse,
    pub verify_response: VerifyOtpResponse,
    pub search_result: Value,
    pub search_status: Option<u16>,
    pub fail_transport: bool,
    pub panic_on: Option<Operation>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl StubLookupClient {
    /// Stub that accepts every step and issues installation id "abc"
    pub fn accepting() -> Self {
        Self {
            login_response: LoginResponse::new(200, json!({"requestId": "req-1", "status": 1})),
            verify_response: VerifyOtpResponse::new(200, json!({"installationId": "abc"})),
            search_result: json!({"data": [{"name": "Jane Doe", "phones": [{"e164Format": "+9876543210"}]}]}),
            search_status: None,
            fail_transport: false,
            panic_on: None,
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login_status(mut self, status_code: u16) -> Self {
        self.login_response.status_code = status_code;
        self
    }

    pub fn with_verify_response(mut self, status_code: u16, data: Value) -> Self {
        self.verify_response = VerifyOtpResponse::new(status_code, data);
        self
    }

    pub fn rejecting_lookups(mut self, status_code: u16) -> Self {
        self.search_status = Some(status_code);
        self
    }

    pub fn failing_transport(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    pub fn panicking_on(mut self, operation: Operation) -> Self {
        self.panic_on = Some(operation);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, operation: Operation, call: RecordedCall) -> Result<(), LookupClientError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_on == Some(operation) {
            panic!("stub panic during {}", operation);
        }
        if self.fail_transport {
            return Err(LookupClientError::Transport("connection refused".to_string()));
        }
        if let (Operation::Search | Operation::BulkSearch, Some(status_code)) =
            (operation, self.search_status)
        {
            return Err(LookupClientError::Rejected { status_code });
        }
        Ok(())
    }
}

#[async_trait]
impl LookupClient for StubLookupClient {
    async fn login(&self, phone_number: &str) -> Result<LoginResponse, LookupClientError> {
        self.enter(
            Operation::RequestOtp,
            RecordedCall::Login { phone: phone_number.to_string() },
        )
        .await?;
        Ok(self.login_response.clone())
    }

    async fn verify_otp(
        &self,
        phone_number: &str,
        context: &Value,
        otp: &str,
    ) -> Result<VerifyOtpResponse, LookupClientError> {
        self.enter(
            Operation::VerifyOtp,
            RecordedCall::VerifyOtp {
                phone: phone_number.to_string(),
                context: context.clone(),
                otp: otp.to_string(),
            },
        )
        .await?;
        Ok(self.verify_response.clone())
    }

    async fn search_phone_number(
        &self,
        phone_number: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        self.enter(
            Operation::Search,
            RecordedCall::Search {
                phone: phone_number.to_string(),
                country: country_code.to_string(),
                installation_id: installation_id.to_string(),
            },
        )
        .await?;
        Ok(self.search_result.clone())
    }

    async fn bulk_search(
        &self,
        phone_numbers: &str,
        country_code: &str,
        installation_id: &str,
    ) -> Result<LookupResult, LookupClientError> {
        self.enter(
            Operation::BulkSearch,
            RecordedCall::BulkSearch {
                phones: phone_numbers.to_string(),
                country: country_code.to_string(),
                installation_id: installation_id.to_string(),
            },
        )
        .await?;
        Ok(json!({"bulk": true, "query": phone_numbers}))
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }
}

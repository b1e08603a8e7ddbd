//! Types exchanged with the lookup service client

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Status code the lookup service uses for success
pub const SUCCESS_STATUS: u16 = 200;

/// Search results are opaque and passed through verbatim
pub type LookupResult = Value;

/// Response of the login (OTP request) call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub data: Value,
}

impl LoginResponse {
    pub fn new(status_code: u16, data: Value) -> Self {
        Self { status_code, data }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS
    }
}

/// Response of the OTP verification call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    #[serde(alias = "status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub data: Value,
}

impl VerifyOtpResponse {
    pub fn new(status_code: u16, data: Value) -> Self {
        Self { status_code, data }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS
    }

    /// Installation id from `data.installationId`, if present and non-empty
    pub fn installation_id(&self) -> Option<&str> {
        self.data
            .get("installationId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Failures raised by a lookup client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupClientError {
    #[error("request rejected with status {status_code}")]
    Rejected { status_code: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("client misconfigured: {0}")]
    Configuration(String),
}

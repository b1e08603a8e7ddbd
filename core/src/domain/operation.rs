//! Flow operations exposed to callers.

use serde::{Deserialize, Serialize};

/// One of the four remote operations of the verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    RequestOtp,
    VerifyOtp,
    Search,
    BulkSearch,
}

impl Operation {
    /// Stable identifier used in structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RequestOtp => "request_otp",
            Operation::VerifyOtp => "verify_otp",
            Operation::Search => "search",
            Operation::BulkSearch => "bulk_search",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::RequestOtp => write!(f, "request OTP"),
            Operation::VerifyOtp => write!(f, "verify OTP"),
            Operation::Search => write!(f, "search"),
            Operation::BulkSearch => write!(f, "bulk search"),
        }
    }
}

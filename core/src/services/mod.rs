//! Services containing the flow logic and its collaborator contract.

pub mod flow;
pub mod lookup;

// Re-export commonly used types
pub use flow::{dispatch, FlowTask, VerificationFlow};
pub use lookup::{
    LoginResponse, LookupClient, LookupClientError, LookupResult, VerifyOtpResponse,
    SUCCESS_STATUS,
};

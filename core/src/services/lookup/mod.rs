//! Lookup service collaborator contract
//!
//! The lookup service client owns the wire protocol, request signing and
//! response parsing. The flow only relies on the status code of the login and
//! verification responses and on the installation id in the latter.

mod traits;
mod types;

pub use traits::LookupClient;
pub use types::{LoginResponse, LookupClientError, LookupResult, VerifyOtpResponse, SUCCESS_STATUS};

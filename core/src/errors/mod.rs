//! Flow error kinds surfaced to callers.
//!
//! Every failure of a flow operation is reported as one `FlowError` and leaves
//! the session exactly as it was before the call.

use thiserror::Error;

use crate::domain::{Operation, Stage};
use crate::services::lookup::LookupClientError;

/// Errors returned by verification flow operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A required input was empty
    #[error("Please enter the {field}.")]
    Validation { field: String },

    /// The operation is not valid at the current stage
    #[error("Cannot {operation} while {stage}.")]
    IllegalState { operation: Operation, stage: Stage },

    /// The lookup service answered with a non-success status code
    #[error("Failed to {operation} (status {status_code}). Please try again.")]
    RemoteRejected { operation: Operation, status_code: u16 },

    /// Verification succeeded but no installation id was returned
    #[error("Failed to get installation id from verification response.")]
    MissingInstallationId,

    /// The lookup service could not be reached or the call failed outright
    #[error("Lookup service unavailable while trying to {operation}: {message}")]
    RemoteUnavailable { operation: Operation, message: String },
}

impl FlowError {
    /// Builds a `Validation` error for `field`
    pub fn required(field: impl Into<String>) -> Self {
        FlowError::Validation {
            field: field.into(),
        }
    }

    /// Maps a collaborator failure to a flow error
    ///
    /// A status rejection becomes `RemoteRejected`, anything else
    /// `RemoteUnavailable`.
    pub fn from_lookup(operation: Operation, error: LookupClientError) -> Self {
        match error {
            LookupClientError::Rejected { status_code } => FlowError::RemoteRejected {
                operation,
                status_code,
            },
            other => FlowError::RemoteUnavailable {
                operation,
                message: other.to_string(),
            },
        }
    }

    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::Validation { .. } => "validation_error",
            FlowError::IllegalState { .. } => "illegal_state",
            FlowError::RemoteRejected { .. } => "remote_rejected",
            FlowError::MissingInstallationId => "missing_installation_id",
            FlowError::RemoteUnavailable { .. } => "remote_unavailable",
        }
    }

    /// Whether repeating the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FlowError::RemoteRejected { .. }
                | FlowError::RemoteUnavailable { .. }
                | FlowError::MissingInstallationId
        )
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

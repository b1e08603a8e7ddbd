//! Verification session entity.
//!
//! A session holds the state collected while walking through the flow:
//! the phone number an OTP was requested for, the accepted OTP, and the
//! installation id issued by the lookup service. All mutation goes through
//! the `record_*` methods, which enforce the stage invariants.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{FlowError, FlowResult};

use super::operation::Operation;

/// Position of a session in the three-step verification flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No OTP has been requested yet
    #[default]
    AwaitingPhone,
    /// An OTP was requested and the login call succeeded
    AwaitingOtp,
    /// The OTP was accepted and an installation id was issued
    Verified,
}

impl Stage {
    /// Whether `operation` may be invoked while in this stage
    pub fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::RequestOtp => matches!(self, Stage::AwaitingPhone | Stage::AwaitingOtp),
            Operation::VerifyOtp => matches!(self, Stage::AwaitingOtp),
            Operation::Search | Operation::BulkSearch => matches!(self, Stage::Verified),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Stage::Verified)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::AwaitingPhone => write!(f, "awaiting phone number"),
            Stage::AwaitingOtp => write!(f, "awaiting OTP"),
            Stage::Verified => write!(f, "verified"),
        }
    }
}

/// Verification session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Identifier used to correlate log lines
    id: Uuid,

    /// Phone number the OTP was requested for
    phone_number: Option<String>,

    /// OTP accepted by the lookup service
    #[serde(skip_serializing)]
    otp: Option<String>,

    /// Token required by all lookup calls
    installation_id: Option<String>,

    /// Payload returned by the login call, handed back on verification
    #[serde(skip_serializing)]
    login_context: Option<Value>,

    /// Current stage
    stage: Stage,

    /// When the session was created
    created_at: DateTime<Utc>,

    /// When the OTP was accepted
    verified_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session at `AwaitingPhone`
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: None,
            otp: None,
            installation_id: None,
            login_context: None,
            stage: Stage::AwaitingPhone,
            created_at: Utc::now(),
            verified_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn otp(&self) -> Option<&str> {
        self.otp.as_deref()
    }

    pub fn installation_id(&self) -> Option<&str> {
        self.installation_id.as_deref()
    }

    /// Login payload to pass as verification context (empty object if none)
    pub fn login_context(&self) -> Value {
        self.login_context
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Fails with `IllegalState` unless the current stage allows `operation`
    pub fn ensure_allows(&self, operation: Operation) -> FlowResult<()> {
        if self.stage.allows(operation) {
            Ok(())
        } else {
            Err(FlowError::IllegalState {
                operation,
                stage: self.stage,
            })
        }
    }

    /// Records a successful login and moves to `AwaitingOtp`
    ///
    /// Any OTP from an earlier request is forgotten.
    pub(crate) fn record_otp_requested(
        &mut self,
        phone_number: String,
        login_context: Value,
    ) -> FlowResult<()> {
        self.ensure_allows(Operation::RequestOtp)?;

        self.phone_number = Some(phone_number);
        self.login_context = Some(login_context);
        self.otp = None;
        self.stage = Stage::AwaitingOtp;
        Ok(())
    }

    /// Records an accepted OTP and moves to `Verified`
    ///
    /// The installation id is set exactly once; a session never leaves
    /// `Verified`.
    pub(crate) fn record_verified(&mut self, otp: String, installation_id: String) -> FlowResult<()> {
        self.ensure_allows(Operation::VerifyOtp)?;
        if installation_id.is_empty() {
            return Err(FlowError::MissingInstallationId);
        }

        self.otp = Some(otp);
        self.installation_id = Some(installation_id);
        self.stage = Stage::Verified;
        self.verified_at = Some(Utc::now());
        Ok(())
    }

    /// Installation id for lookup calls, enforcing the `Verified` stage
    pub(crate) fn lookup_token(&self, operation: Operation) -> FlowResult<&str> {
        self.ensure_allows(operation)?;
        // Verified always carries a non-empty installation id
        self.installation_id
            .as_deref()
            .ok_or(FlowError::MissingInstallationId)
    }
}

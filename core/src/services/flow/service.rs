//! Verification flow controller implementation

use std::sync::Arc;

use cl_shared::phone::{
    is_country_code, is_valid_international_phone, mask_phone_list, mask_phone_number,
    mask_secret,
};
use tokio::sync::{watch, Mutex};

use crate::domain::{Operation, Session, Stage};
use crate::errors::{FlowError, FlowResult};
use crate::services::lookup::{
    LoginResponse, LookupClient, LookupClientError, LookupResult, VerifyOtpResponse,
};

use super::dispatch::{dispatch, FlowTask};

/// Verification flow controller
///
/// Owns the session and is the only place it is mutated. Operations on one
/// flow are serialized: the session lock is held for the whole remote call.
/// Stage changes are published to subscribers through a watch channel.
pub struct VerificationFlow<C: LookupClient + ?Sized> {
    /// Lookup service client
    client: Arc<C>,
    /// Current session
    session: Arc<Mutex<Session>>,
    /// Stage change notifications
    stage_tx: Arc<watch::Sender<Stage>>,
}

impl<C: LookupClient + ?Sized> Clone for VerificationFlow<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            session: Arc::clone(&self.session),
            stage_tx: Arc::clone(&self.stage_tx),
        }
    }
}

impl<C: LookupClient + ?Sized> VerificationFlow<C> {
    /// Create a new flow with an empty session
    ///
    /// # Arguments
    ///
    /// * `client` - Lookup service client implementation
    pub fn new(client: Arc<C>) -> Self {
        let (stage_tx, _) = watch::channel(Stage::AwaitingPhone);
        Self {
            client,
            session: Arc::new(Mutex::new(Session::new())),
            stage_tx: Arc::new(stage_tx),
        }
    }

    /// Name of the lookup provider in use
    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    /// Current stage, readable while an operation is in flight
    pub fn stage(&self) -> Stage {
        *self.stage_tx.borrow()
    }

    /// Receiver notified on every stage change
    pub fn subscribe(&self) -> watch::Receiver<Stage> {
        self.stage_tx.subscribe()
    }

    /// Copy of the current session, waiting for any in-flight operation
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// Copy of the current session, or `None` while an operation is in flight
    pub fn try_snapshot(&self) -> Option<Session> {
        self.session.try_lock().ok().map(|session| session.clone())
    }

    /// Discard the session and start over at `AwaitingPhone`
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        tracing::info!(
            session_id = %session.id(),
            event = "session_reset",
            "Discarding verification session"
        );
        *session = Session::new();
        self.publish(session.stage());
    }

    /// Request an OTP for `phone_number`
    ///
    /// On success the phone number and the login payload are stored and the
    /// session moves to `AwaitingOtp`. The login response is returned for
    /// display.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginResponse)` - The collaborator's response
    /// * `Err(FlowError)` - `Validation`, `IllegalState`, `RemoteRejected` or `RemoteUnavailable`
    pub async fn request_otp(&self, phone_number: &str) -> FlowResult<LoginResponse> {
        require("phone number", phone_number)?;

        let mut session = self.session.lock().await;
        session.ensure_allows(Operation::RequestOtp)?;

        let masked = mask_phone_number(phone_number);
        if !is_valid_international_phone(phone_number) {
            tracing::warn!(
                phone = %masked,
                "Phone number does not look like E.164, sending as entered"
            );
        }

        tracing::info!(
            phone = %masked,
            session_id = %session.id(),
            provider = self.client.provider_name(),
            event = "otp_requested",
            "Requesting OTP from lookup service"
        );

        let response = self
            .client
            .login(phone_number)
            .await
            .map_err(|e| remote_failure(Operation::RequestOtp, e))?;

        if !response.is_success() {
            tracing::warn!(
                phone = %masked,
                status_code = response.status_code,
                event = "otp_request_rejected",
                "Lookup service rejected OTP request"
            );
            return Err(FlowError::RemoteRejected {
                operation: Operation::RequestOtp,
                status_code: response.status_code,
            });
        }

        session.record_otp_requested(phone_number.to_string(), response.data.clone())?;
        self.publish(session.stage());

        tracing::info!(
            phone = %masked,
            session_id = %session.id(),
            event = "otp_sent",
            "OTP requested successfully"
        );

        Ok(response)
    }

    /// Verify the OTP received for the stored phone number
    ///
    /// On success the installation id is stored and the session moves to
    /// `Verified`.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOtpResponse)` - The collaborator's response
    /// * `Err(FlowError)` - `Validation`, `IllegalState`, `RemoteRejected`,
    ///   `MissingInstallationId` or `RemoteUnavailable`
    pub async fn verify_otp(&self, otp: &str) -> FlowResult<VerifyOtpResponse> {
        require("OTP", otp)?;

        let mut session = self.session.lock().await;
        session.ensure_allows(Operation::VerifyOtp)?;

        let phone_number = session.phone_number().unwrap_or_default().to_string();
        let masked = mask_phone_number(&phone_number);

        tracing::info!(
            phone = %masked,
            session_id = %session.id(),
            event = "otp_verification_started",
            "Verifying OTP with lookup service"
        );

        let response = self
            .client
            .verify_otp(&phone_number, &session.login_context(), otp)
            .await
            .map_err(|e| remote_failure(Operation::VerifyOtp, e))?;

        if !response.is_success() {
            tracing::warn!(
                phone = %masked,
                status_code = response.status_code,
                event = "otp_verification_failed",
                "Lookup service rejected OTP"
            );
            return Err(FlowError::RemoteRejected {
                operation: Operation::VerifyOtp,
                status_code: response.status_code,
            });
        }

        let installation_id = match response.installation_id() {
            Some(id) => id.to_string(),
            None => {
                tracing::error!(
                    phone = %masked,
                    event = "installation_id_missing",
                    "Verification succeeded without an installation id"
                );
                return Err(FlowError::MissingInstallationId);
            }
        };

        session.record_verified(otp.to_string(), installation_id)?;
        self.publish(session.stage());

        tracing::info!(
            phone = %masked,
            session_id = %session.id(),
            installation_id = %mask_secret(session.installation_id().unwrap_or_default()),
            event = "otp_verified_success",
            "OTP verified"
        );

        Ok(response)
    }

    /// Look up a single number
    ///
    /// The collaborator's result is returned unchanged.
    pub async fn search(&self, phone_number: &str, country_code: &str) -> FlowResult<LookupResult> {
        require("search number", phone_number)?;
        require("country code", country_code)?;
        check_country_code(country_code);

        let session = self.session.lock().await;
        let installation_id = session.lookup_token(Operation::Search)?;

        tracing::info!(
            phone = %mask_phone_number(phone_number),
            country = country_code,
            session_id = %session.id(),
            event = "search",
            "Searching phone number"
        );

        self.client
            .search_phone_number(phone_number, country_code, installation_id)
            .await
            .map_err(|e| remote_failure(Operation::Search, e))
    }

    /// Look up a comma separated list of numbers
    ///
    /// `phone_numbers` is handed to the collaborator exactly as given.
    pub async fn bulk_search(
        &self,
        phone_numbers: &str,
        country_code: &str,
    ) -> FlowResult<LookupResult> {
        require("bulk numbers", phone_numbers)?;
        require("country code", country_code)?;
        check_country_code(country_code);

        let session = self.session.lock().await;
        let installation_id = session.lookup_token(Operation::BulkSearch)?;

        tracing::info!(
            phones = %mask_phone_list(phone_numbers),
            country = country_code,
            session_id = %session.id(),
            event = "bulk_search",
            "Searching phone numbers in bulk"
        );

        self.client
            .bulk_search(phone_numbers, country_code, installation_id)
            .await
            .map_err(|e| remote_failure(Operation::BulkSearch, e))
    }

    fn publish(&self, stage: Stage) {
        let changed = self.stage_tx.send_if_modified(|current| {
            if *current == stage {
                false
            } else {
                *current = stage;
                true
            }
        });
        if changed {
            tracing::debug!(stage = %stage, event = "stage_changed", "Verification stage changed");
        }
    }
}

impl<C: LookupClient + ?Sized + 'static> VerificationFlow<C> {
    /// Run `request_otp` on its own task
    pub fn spawn_request_otp(&self, phone_number: String) -> FlowTask<LoginResponse> {
        let flow = self.clone();
        dispatch(Operation::RequestOtp, async move {
            flow.request_otp(&phone_number).await
        })
    }

    /// Run `verify_otp` on its own task
    pub fn spawn_verify_otp(&self, otp: String) -> FlowTask<VerifyOtpResponse> {
        let flow = self.clone();
        dispatch(Operation::VerifyOtp, async move { flow.verify_otp(&otp).await })
    }

    /// Run `search` on its own task
    pub fn spawn_search(&self, phone_number: String, country_code: String) -> FlowTask<LookupResult> {
        let flow = self.clone();
        dispatch(Operation::Search, async move {
            flow.search(&phone_number, &country_code).await
        })
    }

    /// Run `bulk_search` on its own task
    pub fn spawn_bulk_search(
        &self,
        phone_numbers: String,
        country_code: String,
    ) -> FlowTask<LookupResult> {
        let flow = self.clone();
        dispatch(Operation::BulkSearch, async move {
            flow.bulk_search(&phone_numbers, &country_code).await
        })
    }
}

fn require(field: &str, value: &str) -> FlowResult<()> {
    if value.is_empty() {
        return Err(FlowError::required(field));
    }
    Ok(())
}

fn check_country_code(country_code: &str) {
    if !is_country_code(country_code) {
        tracing::warn!(
            country = country_code,
            "Country code is not a two-letter code, sending as entered"
        );
    }
}

fn remote_failure(operation: Operation, error: LookupClientError) -> FlowError {
    tracing::error!(
        operation = operation.as_str(),
        error = %error,
        event = "lookup_call_failed",
        "Lookup service call failed"
    );
    FlowError::from_lookup(operation, error)
}

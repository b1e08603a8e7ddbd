//! Rendering of prompts, results, errors and stage changes

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use cl_core::{FlowError, Operation, Session, Stage};
use cl_shared::phone::{mask_phone_number, mask_secret};

pub const HELP: &str = "\
Commands:
  <phone number>             request an OTP (while awaiting the phone number)
  <otp>                      verify the OTP (while awaiting the OTP)
  phone <number>             request an OTP for a (different) number
  search <number> <country>  look up one number, e.g. search +9876543210 US
  bulk <n1,n2,...> <country> look up several numbers, e.g. bulk +1234567890,+9876543210 IN
  status                     show the current session
  reset                      discard the session and start over
  help                       show this help
  quit                       exit";

/// Prompt shown for the stage
pub fn prompt(stage: Stage) -> &'static str {
    match stage {
        Stage::AwaitingPhone => "Phone Number (e.g., +1234567890): ",
        Stage::AwaitingOtp => "OTP: ",
        Stage::Verified => "lookup> ",
    }
}

/// Line announcing a stage change
pub fn stage_banner(stage: Stage) -> String {
    match stage {
        Stage::AwaitingPhone => "==> Enter the phone number to verify.".to_string(),
        Stage::AwaitingOtp => "==> OTP requested. Enter the code you received.".to_string(),
        Stage::Verified => {
            "==> Verified. Use 'search <number> <country>' or 'bulk <numbers> <country>'.".to_string()
        }
    }
}

/// Line printed when an operation is dispatched
pub fn progress_message(operation: Operation) -> &'static str {
    match operation {
        Operation::RequestOtp => "Requesting OTP from the lookup service...",
        Operation::VerifyOtp => "Verifying OTP...",
        Operation::Search => "Searching...",
        Operation::BulkSearch => "Running bulk search...",
    }
}

/// Render a collaborator response for display
pub fn render_response<T: Serialize>(response: &T) -> String {
    let body = serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!("<unprintable response: {}>", e));
    format!("Response:\n{}", body)
}

/// Render a flow error as a single message
pub fn render_error(error: &FlowError) -> String {
    if error.is_retryable() {
        format!("Error: {} ({})", error, error.code())
    } else {
        format!("Error: {}", error)
    }
}

/// Render the session summary for the `status` command
///
/// `session` is `None` while an operation holds the session.
pub fn render_status(stage: Stage, session: Option<&Session>, busy: bool) -> String {
    let mut lines = vec![format!("Stage: {}", stage)];

    match session {
        Some(session) => {
            lines.push(format!("Session: {}", session.id()));
            if let Some(phone) = session.phone_number() {
                lines.push(format!("Phone: {}", mask_phone_number(phone)));
            }
            if let Some(id) = session.installation_id() {
                lines.push(format!("Installation id: {}", mask_secret(id)));
            }
            if let Some(verified_at) = session.verified_at() {
                lines.push(format!("Verified at: {}", verified_at.to_rfc3339()));
            }
        }
        None => lines.push("Session: (in use)".to_string()),
    }

    if busy {
        lines.push("A request is in progress.".to_string());
    }

    lines.join("\n")
}

/// Print a banner every time the flow changes stage
pub fn spawn_stage_watcher(mut stages: watch::Receiver<Stage>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while stages.changed().await.is_ok() {
            let stage = *stages.borrow_and_update();
            tracing::debug!(stage = %stage, "Rendering stage change");
            println!("{}", stage_banner(stage));
        }
    })
}

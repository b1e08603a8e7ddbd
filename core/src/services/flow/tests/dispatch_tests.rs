//! Unit tests for running flow operations on their own task

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Operation, Stage};
use crate::errors::FlowError;
use crate::services::flow::{dispatch, VerificationFlow};

use super::mocks::StubLookupClient;

#[tokio::test]
async fn test_spawned_operations_complete_the_flow() {
    let client = Arc::new(StubLookupClient::accepting());
    let flow = VerificationFlow::new(client);

    let task = flow.spawn_request_otp("+1234567890".to_string());
    assert_eq!(task.operation(), Operation::RequestOtp);
    task.await.unwrap();

    flow.spawn_verify_otp("000000".to_string()).await.unwrap();
    let result = flow
        .spawn_search("+9876543210".to_string(), "US".to_string())
        .await
        .unwrap();
    assert!(result.get("data").is_some());

    flow.spawn_bulk_search("+1,+2".to_string(), "US".to_string())
        .await
        .unwrap();
    assert_eq!(flow.stage(), Stage::Verified);
}

#[tokio::test]
async fn test_panicking_collaborator_maps_to_remote_unavailable() {
    let client = Arc::new(StubLookupClient::accepting().panicking_on(Operation::RequestOtp));
    let flow = VerificationFlow::new(client);

    let err = flow
        .spawn_request_otp("+1234567890".to_string())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FlowError::RemoteUnavailable {
            operation: Operation::RequestOtp,
            message: "operation panicked".to_string(),
        }
    );
    assert_eq!(flow.stage(), Stage::AwaitingPhone);

    // The session lock was released by the panicking task
    let session = flow.snapshot().await;
    assert!(session.phone_number().is_none());
}

#[tokio::test]
async fn test_dispatch_returns_operation_errors() {
    let task = dispatch(Operation::Search, async {
        Err::<(), _>(FlowError::required("search number"))
    });
    assert_eq!(task.await.unwrap_err(), FlowError::required("search number"));
}

#[tokio::test(start_paused = true)]
async fn test_state_readable_while_operation_in_flight() {
    let client = Arc::new(StubLookupClient::accepting().with_delay(Duration::from_millis(500)));
    let flow = VerificationFlow::new(client);

    let task = flow.spawn_request_otp("+1234567890".to_string());
    tokio::task::yield_now().await;

    assert!(!task.is_finished());
    assert!(flow.try_snapshot().is_none());
    assert_eq!(flow.stage(), Stage::AwaitingPhone);

    task.await.unwrap();
    assert_eq!(flow.stage(), Stage::AwaitingOtp);
    assert!(flow.try_snapshot().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_operations_are_serialized() {
    let client = Arc::new(StubLookupClient::accepting().with_delay(Duration::from_millis(100)));
    let flow = VerificationFlow::new(client.clone());

    let first = flow.spawn_request_otp("+1234567890".to_string());
    let second = flow.spawn_request_otp("+1987654321".to_string());

    first.await.unwrap();
    second.await.unwrap();

    assert_eq!(client.calls().len(), 2);
    assert_eq!(flow.stage(), Stage::AwaitingOtp);
    let phone = flow.snapshot().await.phone_number().map(str::to_string);
    assert!(phone.as_deref() == Some("+1234567890") || phone.as_deref() == Some("+1987654321"));
}

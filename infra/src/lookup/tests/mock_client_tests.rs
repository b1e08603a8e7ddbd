//! Unit tests for the mock lookup client

use serde_json::json;

use cl_core::{LookupClient, LookupClientError};

use crate::lookup::MockLookupClient;

#[tokio::test]
async fn test_login_accepts_e164_numbers() {
    let client = MockLookupClient::with_options("123456", false, false);

    let response = client.login("+14155552671").await.unwrap();
    assert!(response.is_success());
    assert!(response.data.get("requestId").is_some());

    let response = client.login("4155552671").await.unwrap();
    assert_eq!(response.status_code, 400);
    assert_eq!(client.get_call_count(), 2);
}

#[tokio::test]
async fn test_verify_accepts_only_configured_otp() {
    let client = MockLookupClient::with_options("654321", false, false);

    let rejected = client
        .verify_otp("+14155552671", &json!({}), "123456")
        .await
        .unwrap();
    assert_eq!(rejected.status_code, 400);
    assert!(rejected.installation_id().is_none());

    let accepted = client
        .verify_otp("+14155552671", &json!({}), "654321")
        .await
        .unwrap();
    assert!(accepted.is_success());
    assert!(accepted.installation_id().unwrap().starts_with("mock-"));
}

#[tokio::test]
async fn test_installation_ids_are_unique() {
    let client = MockLookupClient::with_options("123456", false, false);

    let first = client.verify_otp("+14155552671", &json!({}), "123456").await.unwrap();
    let second = client.verify_otp("+14155552671", &json!({}), "123456").await.unwrap();
    assert_ne!(first.installation_id(), second.installation_id());
}

#[tokio::test]
async fn test_search_results() {
    let client = MockLookupClient::with_options("123456", false, false);

    let single = client.search_phone_number("+9876543210", "us", "inst").await.unwrap();
    assert_eq!(single["data"][0]["phones"][0]["e164Format"], "+9876543210");
    assert_eq!(single["data"][0]["phones"][0]["countryCode"], "US");

    let bulk = client
        .bulk_search("+14155552671, +442071838750,", "GB", "inst")
        .await
        .unwrap();
    let entries = bulk["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["key"], "+442071838750");
}

#[tokio::test]
async fn test_failure_simulation() {
    let mut client = MockLookupClient::with_options("123456", false, false);
    client.set_simulate_failure(true);

    let err = client.login("+14155552671").await.unwrap_err();
    assert!(matches!(err, LookupClientError::Transport(_)));

    client.set_simulate_failure(false);
    assert!(client.login("+14155552671").await.is_ok());
}

#[test]
fn test_otp_banner_masks_phone_number() {
    let client = MockLookupClient::with_options("424242", false, false);

    let banner = client.otp_banner("+14155552671");
    assert!(!banner.contains("+14155552671"));
    assert!(banner.contains("2671"));
    assert!(banner.contains("OTP: 424242"));
}

mod common;

use doorman::db::OtpStore;
use doorman::services;
use doorman::utils::errors::DoormanError;
use more_asserts::assert_le;
use crate::common::{fixed_time, start_doorman, start_doorman_with_failing_mailer};


#[tokio::test]
async fn test_a_code_is_issued_hashed_at_rest_and_emailed() {
    let harness = start_doorman();
    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:30:00Z")));

    services::request_otp(&harness.ctx, "student@campus.edu")
        .await
        .expect("the request should succeed");

    // The plaintext code went out through the mailer...
    let code = harness.sent_code("student@campus.edu");
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    // ...and only the hash was stored, with a fresh lifecycle.
    let record = harness.otp_store.find("student@campus.edu").await.unwrap()
        .expect("a pending record should have been stored");
    assert_ne!(record.code_phc, code);
    assert_eq!(record.attempts, 0);
    assert_eq!(record.verified, false);
    assert_eq!(record.last_sent_at, fixed_time("2021-08-23T09:30:00Z"));
    assert_eq!(record.expires_at, fixed_time("2021-08-23T09:35:00Z"));
}


#[tokio::test]
async fn test_requests_inside_the_cooldown_are_rejected() {
    let harness = start_doorman();
    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:30:00Z")));

    services::request_otp(&harness.ctx, "student@campus.edu")
        .await
        .expect("the first request should succeed");

    // 30 seconds later - still inside the cooldown.
    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:30:30Z")));

    match services::request_otp(&harness.ctx, "student@campus.edu").await {
        Err(DoormanError::RateLimited { cooldown_seconds }) => {
            assert_eq!(cooldown_seconds, 30);
        },
        other => panic!("expected RateLimited, got {:?}", other),
    }

    // An immediate retry reports the full cooldown.
    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:30:00Z")));

    match services::request_otp(&harness.ctx, "student@campus.edu").await {
        Err(DoormanError::RateLimited { cooldown_seconds }) => {
            assert!(cooldown_seconds > 0);
            assert_le!(cooldown_seconds, 60);
        },
        other => panic!("expected RateLimited, got {:?}", other),
    }

    // Only the first code was ever sent.
    assert_eq!(harness.mailer.sent().len(), 1);
}


#[tokio::test]
async fn test_a_new_code_can_be_requested_once_the_cooldown_passes() {
    let harness = start_doorman();
    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:30:00Z")));

    services::request_otp(&harness.ctx, "student@campus.edu")
        .await
        .expect("the first request should succeed");

    harness.ctx.set_now(Some(fixed_time("2021-08-23T09:31:01Z")));

    services::request_otp(&harness.ctx, "student@campus.edu")
        .await
        .expect("a request after the cooldown should succeed");

    assert_eq!(harness.mailer.sent().len(), 2);

    // The record was overwritten with the new send.
    let record = harness.otp_store.find("student@campus.edu").await.unwrap()
        .expect("a pending record should exist");
    assert_eq!(record.last_sent_at, fixed_time("2021-08-23T09:31:01Z"));
    assert_eq!(record.attempts, 0);
}


#[tokio::test]
async fn test_malformed_addresses_are_rejected() {
    let harness = start_doorman();

    for email in &["", "   ", "not-an-email", "missing@tld"] {
        match services::request_otp(&harness.ctx, email).await {
            Err(DoormanError::InvalidInput(_)) => {},
            other => panic!("expected InvalidInput for {:?}, got {:?}", email, other),
        }
    }

    assert!(harness.mailer.sent().is_empty());
}


#[tokio::test]
async fn test_the_address_is_normalized_before_storing() {
    let harness = start_doorman();

    services::request_otp(&harness.ctx, "Test@Example.com ")
        .await
        .expect("the request should succeed");

    // The stored key and the delivery address are both the normalized form.
    assert!(harness.otp_store.find("test@example.com").await.unwrap().is_some());
    assert_eq!(harness.mailer.sent()[0].0, "test@example.com");
}


#[tokio::test]
async fn test_delivery_failure_rolls_the_record_back() {
    let (ctx, otp_store) = start_doorman_with_failing_mailer("relay refused the connection");

    match services::request_otp(&ctx, "student@campus.edu").await {
        Err(DoormanError::DeliveryFailed(reason)) => {
            assert!(reason.contains("relay refused the connection"));
        },
        other => panic!("expected DeliveryFailed, got {:?}", other),
    }

    // No record is left behind, so the address is not stuck behind the cooldown.
    assert!(otp_store.find("student@campus.edu").await.unwrap().is_none());
}

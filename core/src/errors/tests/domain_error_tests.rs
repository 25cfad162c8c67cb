//! Unit tests for domain error types

use pms_shared::IntoErrorResponse;

use crate::errors::{human_duration, DomainError, EmailError, OtpError, StoreError};

#[test]
fn test_otp_error_messages() {
    assert_eq!(
        OtpError::AccountLocked { lock_seconds: 1800, newly_locked: false }.to_string(),
        "Account locked due to multiple failed attempts! Try again after 30 minutes"
    );
    assert_eq!(
        OtpError::AccountLocked { lock_seconds: 1800, newly_locked: true }.to_string(),
        "Too many failed attempts. Your account is locked for 30 minutes!"
    );
    assert_eq!(
        OtpError::TooManyRequests { wait_seconds: 3600 }.to_string(),
        "Too many OTP requests! Please wait 1 hour before sending request again."
    );
    assert_eq!(
        OtpError::CooldownActive { wait_seconds: 60 }.to_string(),
        "Please wait 1 minute before requesting a new OTP!"
    );
    assert_eq!(OtpError::InvalidOrExpiredOtp.to_string(), "Invalid OTP or Expired!");
    assert_eq!(
        OtpError::IncorrectOtp { remaining_attempts: 2 }.to_string(),
        "Incorrect OTP. 2 attempts left."
    );
}

#[test]
fn test_human_duration() {
    assert_eq!(human_duration(&1), "1 second");
    assert_eq!(human_duration(&45), "45 seconds");
    assert_eq!(human_duration(&60), "1 minute");
    assert_eq!(human_duration(&90), "90 seconds");
    assert_eq!(human_duration(&1800), "30 minutes");
    assert_eq!(human_duration(&7200), "2 hours");
}

#[test]
fn test_otp_errors_are_bad_requests() {
    let errors = vec![
        OtpError::AccountLocked { lock_seconds: 1800, newly_locked: false },
        OtpError::TooManyRequests { wait_seconds: 3600 },
        OtpError::CooldownActive { wait_seconds: 60 },
        OtpError::InvalidOrExpiredOtp,
        OtpError::IncorrectOtp { remaining_attempts: 1 },
    ];

    for error in errors {
        let domain: DomainError = error.into();
        assert_eq!(domain.status_code(), 400);
        assert!(domain.is_operational());
        assert!(domain.as_otp().is_some());
    }
}

#[test]
fn test_collaborator_failures_are_server_faults() {
    let store: DomainError = StoreError::new("connection refused").into();
    let email: DomainError = EmailError::new("smtp timeout").into();

    assert_eq!(store.status_code(), 500);
    assert_eq!(email.status_code(), 500);
    assert!(!store.is_operational());
    assert!(store.as_otp().is_none());
}

#[test]
fn test_incorrect_otp_response_carries_remaining_attempts() {
    let error: DomainError = OtpError::IncorrectOtp { remaining_attempts: 1 }.into();
    let response = error.to_error_response();

    assert_eq!(response.status, 400);
    assert_eq!(response.error, "OTP_INCORRECT");
    assert_eq!(response.message, "Incorrect OTP. 1 attempts left.");
    let details = response.details.unwrap();
    assert_eq!(details["remaining_attempts"], serde_json::json!(1));
}

#[test]
fn test_store_failure_response_hides_backend_details() {
    let error: DomainError = StoreError::new("redis://10.0.0.5:6379 refused").into();
    let response = error.to_error_response();

    assert_eq!(response.status, 500);
    assert_eq!(response.error, "CACHE_ERROR");
    assert!(!response.message.contains("10.0.0.5"));
}

#[test]
fn test_validation_response() {
    let error = DomainError::Validation {
        message: "Email is required".to_string(),
    };
    let response = error.to_error_response();

    assert_eq!(response.status, 400);
    assert_eq!(response.error, "VALIDATION_ERROR");
    assert_eq!(response.message, "Email is required");
}

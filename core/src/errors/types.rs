//! User-facing OTP error types and collaborator failures
//!
//! Every `OtpError` is a recoverable, per-request condition the caller
//! reports back to the user as a bad request. Store and email failures are
//! server faults and are kept separate so they never masquerade as user errors.

use pms_shared::error_codes;
use thiserror::Error;

/// OTP verification errors with fixed user-facing messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    /// `newly_locked` is set on the failed attempt that triggers the lock
    #[error("{}", lock_message(.lock_seconds, .newly_locked))]
    AccountLocked { lock_seconds: u64, newly_locked: bool },

    #[error("Too many OTP requests! Please wait {} before sending request again.", human_duration(.wait_seconds))]
    TooManyRequests { wait_seconds: u64 },

    #[error("Please wait {} before requesting a new OTP!", human_duration(.wait_seconds))]
    CooldownActive { wait_seconds: u64 },

    #[error("Invalid OTP or Expired!")]
    InvalidOrExpiredOtp,

    #[error("Incorrect OTP. {remaining_attempts} attempts left.")]
    IncorrectOtp { remaining_attempts: u32 },
}

impl OtpError {
    /// Stable error code for clients
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::AccountLocked { .. } => error_codes::ACCOUNT_LOCKED,
            OtpError::TooManyRequests { .. } => error_codes::TOO_MANY_REQUESTS,
            OtpError::CooldownActive { .. } => error_codes::COOLDOWN_ACTIVE,
            OtpError::InvalidOrExpiredOtp => error_codes::OTP_INVALID_OR_EXPIRED,
            OtpError::IncorrectOtp { .. } => error_codes::OTP_INCORRECT,
        }
    }
}

/// Failure reported by a key-value store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Key-value store error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Failure reported by an email sender
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Email delivery error: {message}")]
pub struct EmailError {
    pub message: String,
}

impl EmailError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

fn lock_message(lock_seconds: &u64, newly_locked: &bool) -> String {
    if *newly_locked {
        format!(
            "Too many failed attempts. Your account is locked for {}!",
            human_duration(lock_seconds)
        )
    } else {
        format!(
            "Account locked due to multiple failed attempts! Try again after {}",
            human_duration(lock_seconds)
        )
    }
}

/// Render a second count the way the user messages phrase it ("30 minutes", "1 hour")
pub fn human_duration(seconds: &u64) -> String {
    let seconds = *seconds;
    let (amount, unit) = if seconds >= 3600 && seconds % 3600 == 0 {
        (seconds / 3600, "hour")
    } else if seconds >= 60 && seconds % 60 == 0 {
        (seconds / 60, "minute")
    } else {
        (seconds, "second")
    };

    if amount == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", amount, unit)
    }
}

//! Read-only snapshot of the OTP state held for one email address

use serde::Serialize;

/// Observable state of the per-email OTP lifecycle
///
/// `Verified` and `Expired` are transitions back to `NoActiveCode`, so they
/// are never observed directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpState {
    NoActiveCode,
    CodeActive,
    Locked,
}

/// Snapshot of every OTP key for one email, as seen at read time
///
/// Remaining lifetimes are in seconds; `None` means the key is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpStatus {
    pub email: String,
    pub code_active: bool,
    pub code_ttl_seconds: Option<u64>,
    pub attempts: u32,
    pub cooldown_remaining_seconds: Option<u64>,
    pub lock_remaining_seconds: Option<u64>,
    pub request_count: u32,
    pub spam_lock_remaining_seconds: Option<u64>,
}

impl OtpStatus {
    pub fn state(&self) -> OtpState {
        if self.lock_remaining_seconds.is_some() {
            OtpState::Locked
        } else if self.code_active {
            OtpState::CodeActive
        } else {
            OtpState::NoActiveCode
        }
    }

    /// Whether a new code could be requested right now
    pub fn can_request(&self) -> bool {
        self.lock_remaining_seconds.is_none()
            && self.spam_lock_remaining_seconds.is_none()
            && self.cooldown_remaining_seconds.is_none()
    }
}

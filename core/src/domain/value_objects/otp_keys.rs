//! Store key layout for per-email OTP state

/// Active code
pub const CODE_PREFIX: &str = "otp";
/// Resend-prevention window
pub const COOLDOWN_PREFIX: &str = "otp_cooldown";
/// Failed verification attempts since issuance
pub const ATTEMPTS_PREFIX: &str = "otp_attempts";
/// Verification lock after too many wrong guesses
pub const LOCK_PREFIX: &str = "otp_lock";
/// Issuances in the current request window
pub const REQUEST_COUNT_PREFIX: &str = "otp_request_count";
/// Issuance lock after request flooding
pub const SPAM_LOCK_PREFIX: &str = "otp_spam_lock";

/// Value written to the cooldown key
pub const COOLDOWN_MARKER: &str = "true";
/// Value written to both lock keys
pub const LOCK_MARKER: &str = "locked";

/// The six store keys owned by one email address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpKeys {
    pub code: String,
    pub cooldown: String,
    pub attempts: String,
    pub lock: String,
    pub request_count: String,
    pub spam_lock: String,
}

impl OtpKeys {
    pub fn for_email(email: &str) -> Self {
        Self {
            code: format!("{}:{}", CODE_PREFIX, email),
            cooldown: format!("{}:{}", COOLDOWN_PREFIX, email),
            attempts: format!("{}:{}", ATTEMPTS_PREFIX, email),
            lock: format!("{}:{}", LOCK_PREFIX, email),
            request_count: format!("{}:{}", REQUEST_COUNT_PREFIX, email),
            spam_lock: format!("{}:{}", SPAM_LOCK_PREFIX, email),
        }
    }

    /// Keys removed together when a code is consumed or burned by a lockout
    pub fn code_and_attempts(&self) -> [String; 2] {
        [self.code.clone(), self.attempts.clone()]
    }
}

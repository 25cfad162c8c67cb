//! One-time code entity for email verification.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};

/// Length of every issued code
pub const CODE_LENGTH: usize = 6;

/// Smallest code that can be issued
pub const CODE_MIN: u32 = 100_000;

/// Largest code that can be issued
pub const CODE_MAX: u32 = 999_999;

/// A six-digit numeric one-time code
///
/// Codes are drawn from `[CODE_MIN, CODE_MAX]` so they never start with a
/// zero and always render as exactly six digits.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    /// Generate a new code using the OS-provided CSPRNG
    pub fn generate() -> Self {
        let value = OsRng.gen_range(CODE_MIN..=CODE_MAX);
        Self(value.to_string())
    }

    /// Wrap a code read back from the store
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The code as text, exactly as stored and emailed
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare a user-submitted candidate against this code
    ///
    /// The comparison is exact string equality performed in constant time
    /// over equal-length inputs.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.0.len() != candidate.len() {
            return false;
        }
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

// Keep codes out of logs and panic messages
impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OtpCode(******)")
    }
}

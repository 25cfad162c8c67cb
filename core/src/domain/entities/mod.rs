//! Domain entities representing core business objects.

pub mod otp_code;


// Re-export commonly used types
pub use otp_code::{OtpCode, CODE_LENGTH, CODE_MAX, CODE_MIN};

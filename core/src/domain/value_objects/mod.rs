//! Value objects describing where OTP state lives and what it currently says.

pub mod otp_keys;
pub mod otp_status;


pub use otp_keys::OtpKeys;
pub use otp_status::{OtpState, OtpStatus};

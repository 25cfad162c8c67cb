//! Email OTP verification guard
//!
//! This module controls the lifecycle of short-lived verification codes:
//! - Code issuance and delivery by email
//! - Resend cooldowns and hourly request limits
//! - Failed-attempt tracking with temporary lockout
//!
//! All state lives in an external key-value store; the guard itself is stateless.

mod service;
mod traits;
mod types;


pub use service::OtpGuard;
pub use traits::{EmailSender, KeyValueStore};
pub use types::{VerificationEmail, VerificationEmailData};

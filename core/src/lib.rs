//! # PMS Core
//!
//! Core business logic for email verification in the PMS auth service.
//! This crate contains the OTP domain types, the verification guard service,
//! the collaborator traits it depends on, and the error taxonomy.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;

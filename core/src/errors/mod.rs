//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types and utilities
pub use types::{human_duration, EmailError, OtpError, StoreError};

use pms_shared::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

impl DomainError {
    /// HTTP status category this error maps to at the request boundary
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Otp(_) | DomainError::Validation { .. } => 400,
            DomainError::Internal { .. } | DomainError::Store(_) | DomainError::Email(_) => 500,
        }
    }

    /// Whether the error is an expected, user-recoverable condition
    pub fn is_operational(&self) -> bool {
        self.status_code() < 500
    }

    /// The OTP condition behind this error, if any
    pub fn as_otp(&self) -> Option<&OtpError> {
        match self {
            DomainError::Otp(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        let status = self.status_code();
        match self {
            DomainError::Otp(e) => {
                let response = ErrorResponse::new(status, e.code(), e.to_string());
                match e {
                    OtpError::IncorrectOtp { remaining_attempts } => {
                        response.add_detail("remaining_attempts", remaining_attempts)
                    }
                    _ => response,
                }
            }
            DomainError::Validation { message } => {
                ErrorResponse::new(status, error_codes::VALIDATION_ERROR, message.clone())
            }
            // Server faults never leak backend details to the client
            DomainError::Store(_) => {
                ErrorResponse::new(status, error_codes::CACHE_ERROR, "Internal Server Error")
            }
            DomainError::Email(_) => {
                ErrorResponse::new(status, error_codes::EMAIL_ERROR, "Failed to send verification email")
            }
            DomainError::Internal { .. } => {
                ErrorResponse::new(status, error_codes::INTERNAL_ERROR, "Internal Server Error")
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

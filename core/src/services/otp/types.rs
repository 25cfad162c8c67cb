//! Types exchanged with the email collaborator

use serde::Serialize;

/// Template data for a verification email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationEmailData {
    /// Display name of the recipient
    pub name: String,
    /// The six-digit code
    pub otp: String,
}

/// A verification email ready to be rendered and sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub to: String,
    pub subject: String,
    pub template_id: String,
    pub data: VerificationEmailData,
}

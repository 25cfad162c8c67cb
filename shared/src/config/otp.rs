//! OTP lifetime and abuse-limit configuration module

use serde::{Deserialize, Serialize};

/// One-time code configuration
///
/// Every lifetime is in seconds. The defaults are the production values:
/// codes live 5 minutes, resends are blocked for 1 minute, three wrong
/// guesses lock verification for 30 minutes, and a third request inside
/// the hourly window locks issuance for an hour.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Lifetime of an issued code
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: u64,

    /// Resend-prevention window after issuance
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// Verification lock duration after too many wrong guesses
    #[serde(default = "default_lock_duration")]
    pub lock_duration_seconds: u64,

    /// Lifetime of the request counter, refreshed on every counted request
    #[serde(default = "default_request_window")]
    pub request_window_seconds: u64,

    /// Issuance lock duration after request flooding
    #[serde(default = "default_spam_lock_duration")]
    pub spam_lock_duration_seconds: u64,

    /// Wrong guesses allowed per code; the last one locks verification
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Requests counted per window before the next one triggers the spam lock
    #[serde(default = "default_max_requests")]
    pub max_requests_per_window: u32,

    /// Subject line of the verification email
    #[serde(default = "default_subject")]
    pub email_subject: String,

    /// Order of email delivery and code persistence during issuance
    #[serde(default)]
    pub issue_ordering: IssueOrdering,
}

/// Order in which issuance sends the email and persists the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueOrdering {
    /// Send first; a failed send leaves no keys behind and fails the request
    #[default]
    SendThenPersist,
    /// Persist first; a failed send is logged and the code stays valid
    PersistThenSend,
}

impl std::str::FromStr for IssueOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "send_then_persist" | "send-then-persist" => Ok(IssueOrdering::SendThenPersist),
            "persist_then_send" | "persist-then-send" => Ok(IssueOrdering::PersistThenSend),
            _ => Err(format!("Invalid issue ordering: {}", s)),
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: default_code_ttl(),
            cooldown_seconds: default_cooldown(),
            lock_duration_seconds: default_lock_duration(),
            request_window_seconds: default_request_window(),
            spam_lock_duration_seconds: default_spam_lock_duration(),
            max_attempts: default_max_attempts(),
            max_requests_per_window: default_max_requests(),
            email_subject: default_subject(),
            issue_ordering: IssueOrdering::default(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with any `OTP_*` variables that are set and parse
    pub fn merge_env(mut self) -> Self {
        fn var<T: std::str::FromStr>(name: &str) -> Option<T> {
            std::env::var(name).ok().and_then(|v| v.parse().ok())
        }

        if let Some(v) = var("OTP_CODE_TTL_SECONDS") {
            self.code_ttl_seconds = v;
        }
        if let Some(v) = var("OTP_COOLDOWN_SECONDS") {
            self.cooldown_seconds = v;
        }
        if let Some(v) = var("OTP_LOCK_DURATION_SECONDS") {
            self.lock_duration_seconds = v;
        }
        if let Some(v) = var("OTP_REQUEST_WINDOW_SECONDS") {
            self.request_window_seconds = v;
        }
        if let Some(v) = var("OTP_SPAM_LOCK_DURATION_SECONDS") {
            self.spam_lock_duration_seconds = v;
        }
        if let Some(v) = var("OTP_MAX_ATTEMPTS") {
            self.max_attempts = v;
        }
        if let Some(v) = var("OTP_MAX_REQUESTS_PER_WINDOW") {
            self.max_requests_per_window = v;
        }
        if let Some(v) = var("OTP_ISSUE_ORDERING") {
            self.issue_ordering = v;
        }
        self
    }
}

fn default_code_ttl() -> u64 {
    300  // 5 minutes
}

fn default_cooldown() -> u64 {
    60  // 1 minute
}

fn default_lock_duration() -> u64 {
    1800  // 30 minutes
}

fn default_request_window() -> u64 {
    3600  // 1 hour
}

fn default_spam_lock_duration() -> u64 {
    3600  // 1 hour
}

fn default_max_attempts() -> u32 {
    3
}

fn default_max_requests() -> u32 {
    2
}

fn default_subject() -> String {
    String::from("Verify Your Email")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_config_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.code_ttl_seconds, 300);
        assert_eq!(config.cooldown_seconds, 60);
        assert_eq!(config.lock_duration_seconds, 1800);
        assert_eq!(config.request_window_seconds, 3600);
        assert_eq!(config.spam_lock_duration_seconds, 3600);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.max_requests_per_window, 2);
        assert_eq!(config.email_subject, "Verify Your Email");
        assert_eq!(config.issue_ordering, IssueOrdering::SendThenPersist);
    }

    #[test]
    fn test_issue_ordering_from_str() {
        assert_eq!(
            "persist-then-send".parse::<IssueOrdering>().unwrap(),
            IssueOrdering::PersistThenSend
        );
        assert_eq!(
            "SEND_THEN_PERSIST".parse::<IssueOrdering>().unwrap(),
            IssueOrdering::SendThenPersist
        );
        assert!("whenever".parse::<IssueOrdering>().is_err());
    }

    #[test]
    fn test_issue_ordering_serde() {
        let config: OtpConfig =
            serde_json::from_str(r#"{ "issue_ordering": "persist_then_send" }"#).unwrap();
        assert_eq!(config.issue_ordering, IssueOrdering::PersistThenSend);
        assert_eq!(config.max_attempts, 3);
    }
}

//! Unit tests for mock email sender

use pms_core::services::otp::{EmailSender, VerificationEmail, VerificationEmailData};

use crate::email::MockEmailSender;

fn message(to: &str, otp: &str) -> VerificationEmail {
    VerificationEmail {
        to: to.to_string(),
        subject: "Verify Your Email".to_string(),
        template_id: "user-activation-mail".to_string(),
        data: VerificationEmailData {
            name: "Jane".to_string(),
            otp: otp.to_string(),
        },
    }
}

#[tokio::test]
async fn test_mock_records_last_code_per_recipient() {
    let sender = MockEmailSender::with_options(false, false);

    sender.send_verification_email(&message("a@x.com", "111111")).await.unwrap();
    sender.send_verification_email(&message("b@x.com", "222222")).await.unwrap();
    sender.send_verification_email(&message("a@x.com", "333333")).await.unwrap();

    assert_eq!(sender.message_count(), 3);
    assert_eq!(sender.last_code("a@x.com"), Some("333333".to_string()));
    assert_eq!(sender.last_code("b@x.com"), Some("222222".to_string()));
    assert_eq!(sender.last_code("c@x.com"), None);
}

#[tokio::test]
async fn test_mock_simulate_failure() {
    let sender = MockEmailSender::with_options(false, true);

    let result = sender.send_verification_email(&message("a@x.com", "111111")).await;
    assert!(result.is_err());
    assert_eq!(sender.message_count(), 0);
    assert_eq!(sender.last_code("a@x.com"), None);

    sender.set_simulate_failure(false);
    sender.send_verification_email(&message("a@x.com", "111111")).await.unwrap();
    assert_eq!(sender.message_count(), 1);
}

#[tokio::test]
async fn test_mock_reset() {
    let sender = MockEmailSender::with_options(false, false);
    sender.send_verification_email(&message("a@x.com", "111111")).await.unwrap();

    sender.reset();
    assert_eq!(sender.message_count(), 0);
    assert_eq!(sender.last_code("a@x.com"), None);
}

#[tokio::test]
async fn test_clones_share_state() {
    let sender = MockEmailSender::with_options(false, false);
    let clone = sender.clone();

    clone.send_verification_email(&message("a@x.com", "111111")).await.unwrap();
    assert_eq!(sender.message_count(), 1);
}

//! Unit tests for email module

mod mock_email_tests;

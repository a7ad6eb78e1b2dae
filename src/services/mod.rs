mod request_otp;
mod verify_otp;

pub use request_otp::request_otp;
pub use verify_otp::verify_otp;

use lazy_static::lazy_static;
use regex::Regex;
use crate::utils::errors::DoormanError;

/// How long a code stays valid after it is sent.
pub const CODE_LIFETIME_MINUTES: i64 = 5;

/// Minimum gap between two sends to the same address.
pub const RESEND_COOLDOWN_MILLIS: i64 = 60_000;

/// Wrong guesses allowed before the pending code is revoked.
pub const MAX_ATTEMPTS: u32 = 3;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref CODE_PATTERN: Regex = Regex::new(r"^\d{6}$").unwrap();
}

///
/// Trim and lower-case an address. Every store lookup uses this form, so
/// "Test@Example.com " and "test@example.com" are the same key.
///
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

///
/// Validate the shape of an address and return its normalized form.
///
fn validate_email(email: &str) -> Result<String, DoormanError> {
    let normalized = normalize_email(email);

    if normalized.is_empty() {
        return Err(DoormanError::InvalidInput("An email address is required".to_string()))
    }

    if !EMAIL_PATTERN.is_match(&normalized) {
        return Err(DoormanError::InvalidInput(format!("{} is not a valid email address", normalized)))
    }

    Ok(normalized)
}

///
/// Codes are exactly 6 digits - anything else is rejected before the store is
/// ever consulted.
///
fn validate_code(code: &str) -> Result<(), DoormanError> {
    match CODE_PATTERN.is_match(code) {
        true => Ok(()),
        false => Err(DoormanError::InvalidInput("The code must be exactly 6 digits".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        assert_eq!(validate_email("Test@Example.com ").unwrap(), "test@example.com");
        assert_eq!(validate_email("  a@b.com").unwrap(), "a@b.com");
    }

    #[test]
    fn test_malformed_emails_are_rejected() {
        for email in &["", "   ", "no-at-sign", "two@@signs.com@", "spaces in@side.com", "missing@dot"] {
            match validate_email(email) {
                Err(DoormanError::InvalidInput(_)) => {},
                other => panic!("expected InvalidInput for {:?}, got {:?}", email, other),
            }
        }
    }

    #[test]
    fn test_code_shape_is_exactly_six_digits() {
        assert!(validate_code("123456").is_ok());

        for code in &["12345", "1234567", "12a456", "12345 ", " 123456", ""] {
            match validate_code(code) {
                Err(DoormanError::InvalidInput(_)) => {},
                other => panic!("expected InvalidInput for {:?}, got {:?}", code, other),
            }
        }
    }
}

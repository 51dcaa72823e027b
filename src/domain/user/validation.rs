//! User field validation
//!
//! Pure predicates over the raw strings a client submits. They never touch
//! storage and report the first rule that fails.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::DomainError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static FULL_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").unwrap());

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols a password may (and must) draw from
pub const PASSWORD_SYMBOLS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

/// The strength rule a rejected password broke
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    #[error("shorter than {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("no lowercase letter")]
    MissingLowercase,

    #[error("no uppercase letter")]
    MissingUppercase,

    #[error("no digit")]
    MissingDigit,

    #[error("no symbol from @$!%*?&")]
    MissingSymbol,

    #[error("character '{0}' is not allowed")]
    InvalidCharacter(char),
}

/// Errors that can occur during user validation
///
/// The display text is the exact message returned to API clients.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("All fields are required.")]
    MissingFields,

    #[error("Email is required.")]
    MissingEmail,

    #[error("Invalid email format.")]
    InvalidEmail,

    #[error("Invalid full name format.")]
    InvalidFullName,

    #[error("Password does not meet security requirements.")]
    WeakPassword(PasswordRule),
}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validate an email address
///
/// Accepts `local@domain.tld` where every part is free of whitespace and `@`.
/// No further RFC checks are applied.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

/// Validate a full name: ASCII letters and whitespace only
pub fn validate_full_name(full_name: &str) -> Result<(), UserValidationError> {
    if FULL_NAME_PATTERN.is_match(full_name) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidFullName)
    }
}

/// Validate password strength
///
/// Rules:
/// - At least 8 characters
/// - At least one lowercase letter, one uppercase letter and one digit
/// - At least one symbol from `@$!%*?&`
/// - Nothing outside ASCII letters, digits and those symbols
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    check_password_rules(password).map_err(UserValidationError::WeakPassword)
}

fn check_password_rules(password: &str) -> Result<(), PasswordRule> {
    if let Some(c) = password
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !PASSWORD_SYMBOLS.contains(c))
    {
        return Err(PasswordRule::InvalidCharacter(c));
    }

    // Only ASCII survives the check above, so bytes == characters
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRule::TooShort);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRule::MissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRule::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::MissingDigit);
    }

    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        return Err(PasswordRule::MissingSymbol);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Email tests
    #[test]
    fn test_valid_emails() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("a@b.c").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "plainaddress",
            "@example.com",
            "jane@",
            "jane@example",
            "jane@example.",
            "jane doe@example.com",
            "jane@@example.com",
            "jane@exa mple.com",
        ] {
            assert_eq!(
                validate_email(email),
                Err(UserValidationError::InvalidEmail),
                "{email:?} should be rejected"
            );
        }
    }

    // Full name tests
    #[test]
    fn test_valid_full_names() {
        assert!(validate_full_name("Jane Doe").is_ok());
        assert!(validate_full_name("jane").is_ok());
        assert!(validate_full_name("Mary Ann  Smith").is_ok());
    }

    #[test]
    fn test_invalid_full_names() {
        for name in ["", "Jane D.", "R2D2", "O'Brien", "Jane-Doe", "José"] {
            assert_eq!(
                validate_full_name(name),
                Err(UserValidationError::InvalidFullName),
                "{name:?} should be rejected"
            );
        }
    }

    // Password tests
    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("Valid123!").is_ok());
        assert!(validate_password("Secure123!").is_ok());
        assert!(validate_password("aB3@aB3@").is_ok());
    }

    #[test]
    fn test_password_rules() {
        let cases = [
            ("short1!", PasswordRule::TooShort),
            ("Sh0rt!", PasswordRule::TooShort),
            ("alllowercase1!", PasswordRule::MissingUppercase),
            ("ALLUPPERCASE1!", PasswordRule::MissingLowercase),
            ("NoDigits!!", PasswordRule::MissingDigit),
            ("NoSymbol123", PasswordRule::MissingSymbol),
            ("Has Space1!", PasswordRule::InvalidCharacter(' ')),
            ("Hash#Tag12!", PasswordRule::InvalidCharacter('#')),
        ];

        for (password, rule) in cases {
            assert_eq!(
                validate_password(password),
                Err(UserValidationError::WeakPassword(rule)),
                "{password:?}"
            );
        }
    }

    #[test]
    fn test_weak_password_message_hides_rule() {
        let err = validate_password("NoSymbol123").unwrap_err();
        assert_eq!(err.to_string(), "Password does not meet security requirements.");
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: DomainError = UserValidationError::InvalidEmail.into();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(err.message(), "Invalid email format.");
    }
}

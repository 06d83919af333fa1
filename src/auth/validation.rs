//! Input validation for NetLink accounts and profiles.
//!
//! This module provides validation functions for names, usernames and email
//! addresses. Password length rules live in the password module.

use thiserror::Error;

/// Minimum name and username length.
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum name and username length.
pub const MAX_NAME_LENGTH: usize = 50;

/// Usernames that collide with static `/users/*` routes.
pub const RESERVED_USERNAMES: &[&str] = &["profile", "suggestions"];

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Name or username is too short.
    #[error("{0} must be at least {MIN_NAME_LENGTH} characters")]
    TooShort(&'static str),

    /// Name or username is too long.
    #[error("{0} must be at most {MAX_NAME_LENGTH} characters")]
    TooLong(&'static str),

    /// Username contains whitespace, slashes or control characters.
    #[error("username cannot contain spaces, slashes or control characters")]
    UsernameInvalidChars,

    /// Username is taken by a route.
    #[error("username is reserved")]
    UsernameReserved,

    /// Name contains control characters.
    #[error("name contains invalid characters")]
    NameInvalidChars,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,
}

fn validate_length(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    if len < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort(field));
    }
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field));
    }
    Ok(())
}

/// Validate a display name (3-50 characters, no control characters).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_length("name", name)?;
    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::NameInvalidChars);
    }
    Ok(())
}

/// Validate a username.
///
/// Requirements:
/// - Length: 3-50 characters
/// - No whitespace, `/` or control characters (usernames appear in URLs)
/// - Not one of [`RESERVED_USERNAMES`], compared case-insensitively
///
/// # Examples
///
/// ```
/// use netlink::auth::validation::validate_username;
///
/// assert!(validate_username("john_doe").is_ok());
/// assert!(validate_username("jo").is_err());
/// assert!(validate_username("john doe").is_err());
/// assert!(validate_username("profile").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_length("username", username)?;
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '/')
    {
        return Err(ValidationError::UsernameInvalidChars);
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|reserved| username.eq_ignore_ascii_case(reserved))
    {
        return Err(ValidationError::UsernameReserved);
    }
    Ok(())
}

/// Validate a required email address.
///
/// Performs a basic format check: one `@`, a non-empty local part and a
/// dotted domain without empty labels.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }
    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::EmailInvalidFormat);
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::EmailInvalidFormat);
    }
    if domain.split('.').any(|label| label.is_empty()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Bob").is_ok());
        assert!(validate_name("Ada Lovelace").is_ok());
        assert_eq!(validate_name(""), Err(ValidationError::Required("name")));
        assert_eq!(validate_name("   "), Err(ValidationError::Required("name")));
        assert_eq!(validate_name("Al"), Err(ValidationError::TooShort("name")));
        assert_eq!(
            validate_name(&"a".repeat(51)),
            Err(ValidationError::TooLong("name"))
        );
        assert_eq!(
            validate_name("Bad\u{0007}Name"),
            Err(ValidationError::NameInvalidChars)
        );
    }

    #[test]
    fn test_validate_username_exact_lengths() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert_eq!(
            validate_username("ab"),
            Err(ValidationError::TooShort("username"))
        );
        assert_eq!(
            validate_username(&"a".repeat(51)),
            Err(ValidationError::TooLong("username"))
        );
    }

    #[test]
    fn test_validate_username_invalid_chars() {
        assert!(validate_username("john.doe-99").is_ok());
        assert_eq!(
            validate_username("john doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
        assert_eq!(
            validate_username("john/doe"),
            Err(ValidationError::UsernameInvalidChars)
        );
    }

    #[test]
    fn test_validate_username_reserved() {
        for name in ["profile", "suggestions", "Profile"] {
            assert_eq!(
                validate_username(name),
                Err(ValidationError::UsernameReserved)
            );
        }
        assert!(validate_username("profiles").is_ok());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.co.uk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert_eq!(validate_email(""), Err(ValidationError::Required("email")));
        for bad in [
            "invalid",
            "@example.com",
            "user@",
            "user@localhost",
            "user@example..com",
            "user@@example.com",
            "user name@example.com",
        ] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::EmailInvalidFormat),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_validate_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(validate_email(&email), Err(ValidationError::EmailTooLong));
    }
}

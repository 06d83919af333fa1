//! Authentication module for NetLink.
//!
//! This module provides password hashing, session tokens, input validation,
//! signup/login and profile management.

mod password;
mod profile;
mod service;
mod token;
pub mod validation;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use profile::{ProfileService, ProfileUpdateRequest, SUGGESTION_LIMIT};
pub use service::{AuthService, Session, SignupRequest, INVALID_CREDENTIALS};
pub use token::{SessionClaims, SessionTokens, TokenError, DEFAULT_TOKEN_EXPIRY_DAYS};
pub use validation::ValidationError;

use crate::NetlinkError;

impl From<ValidationError> for NetlinkError {
    fn from(e: ValidationError) -> Self {
        NetlinkError::Validation(e.to_string())
    }
}

impl From<PasswordError> for NetlinkError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::TooShort | PasswordError::TooLong => {
                NetlinkError::Validation(e.to_string())
            }
            PasswordError::VerificationFailed => NetlinkError::Auth(e.to_string()),
            PasswordError::HashError(_) | PasswordError::InvalidHash => {
                NetlinkError::Internal(e.to_string())
            }
        }
    }
}

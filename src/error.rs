//! Error types for NetLink.

use thiserror::Error;

/// Common error type for NetLink.
#[derive(Error, Debug)]
pub enum NetlinkError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx backend. Unique constraint violations are
    /// converted to [`NetlinkError::Conflict`] instead.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (missing session, bad credentials).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Authenticated but not allowed to perform the action.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Uniqueness violation.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Image storage error.
    #[error("image storage error: {0}")]
    Storage(String),

    /// Outbound email error.
    #[error("mail error: {0}")]
    Mail(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for NetlinkError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                tracing::debug!("Unique constraint violation: {}", db_err.message());
                return NetlinkError::Conflict(unique_violation_message(db_err.message()).to_string());
            }
        }
        NetlinkError::Database(e.to_string())
    }
}

/// Client-facing text for a unique constraint failure.
///
/// The driver message names the table and column, which stays in the logs.
fn unique_violation_message(driver_message: &str) -> &'static str {
    if driver_message.contains("users.username") {
        "Username already taken"
    } else {
        "User already exists"
    }
}

/// Result type alias for NetLink operations.
pub type Result<T> = std::result::Result<T, NetlinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = NetlinkError::Auth("Invalid credentials".to_string());
        assert_eq!(err.to_string(), "authentication error: Invalid credentials");
    }

    #[test]
    fn test_permission_error_display() {
        let err = NetlinkError::Permission("not the author".to_string());
        assert_eq!(err.to_string(), "permission denied: not the author");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = NetlinkError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_conflict_error_display() {
        let err = NetlinkError::Conflict("User already exists".to_string());
        assert_eq!(err.to_string(), "conflict: User already exists");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NetlinkError = io_err.into();
        assert!(matches!(err, NetlinkError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_unique_violation_message_hides_schema() {
        assert_eq!(
            unique_violation_message("UNIQUE constraint failed: users.email"),
            "User already exists"
        );
        assert_eq!(
            unique_violation_message("UNIQUE constraint failed: users.username"),
            "Username already taken"
        );
    }

    #[test]
    fn test_sqlx_row_not_found_is_database_error() {
        let err: NetlinkError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, NetlinkError::Database(_)));
    }
}

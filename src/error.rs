use thiserror::Error;
use tracing::{error, warn};

use crate::settings::SettingsError;

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Warning, // Yellow - recoverable, shown inline
    Error,   // Red - operation failed
}

/// Rejections raised before any hashing or persistence happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("password is empty")]
    Empty,
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    #[error("passwords do not match")]
    Mismatch,
    #[error("current password is incorrect")]
    IncorrectCurrentPassword,
}

/// Domain-specific errors for the access gate
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Failed to persist credential: {0}")]
    Persistence(#[from] SettingsError),

    #[error("Invalid password: {0}")]
    Validation(#[from] ValidationError),
}

impl GateError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Persistence(_) => ErrorSeverity::Error,
            Self::Validation(_) => ErrorSeverity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Persistence(_) => "Could not save password settings. Please try again.".to_string(),
            Self::Validation(e) => capitalize(&e.to_string()),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use vault_gate::error::ResultExt;
///
/// // Fall back to the generic label if the identity lookup fails
/// let name = identity.username().warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_warnings() {
        let err = GateError::from(ValidationError::TooShort { min: 4 });
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.user_message(), "Password must be at least 4 characters");
    }

    #[test]
    fn persistence_errors_hide_io_details_from_user() {
        let err = GateError::from(SettingsError::Unavailable("disk full".to_string()));
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(!err.user_message().contains("disk full"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn result_ext_maps_err_to_none() {
        let failed: std::result::Result<u8, &str> = Err("boom");
        assert_eq!(failed.warn_on_err(), None);
        let ok: std::result::Result<u8, &str> = Ok(7);
        assert_eq!(ok.log_err(), Some(7));
    }
}

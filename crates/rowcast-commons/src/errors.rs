//! Shared error helpers.
//!
//! A small dependency-free error type for validation failures in the shared
//! crates. The engine and API layers carry their own richer enums; this one
//! exists so commons types can reject bad input without pulling those in.

use std::fmt;

/// Common error type for shared-crate validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    /// Invalid input provided by a caller
    InvalidInput(String),

    /// A configuration value is out of range or malformed
    Configuration(String),

    /// Unexpected internal state
    Internal(String),
}

impl CommonError {
    /// Creates an InvalidInput error with a message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a Configuration error with a message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an Internal error with a message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CommonError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            CommonError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CommonError {}

/// Result type alias using CommonError.
pub type Result<T> = std::result::Result<T, CommonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CommonError::invalid_input("bad name");
        assert!(matches!(err, CommonError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid input: bad name");

        let err = CommonError::configuration("port cannot be 0");
        assert!(matches!(err, CommonError::Configuration(_)));
        assert_eq!(err.to_string(), "Configuration error: port cannot be 0");
    }

    #[test]
    fn test_result_alias() {
        fn check(flag: bool) -> Result<u32> {
            if flag {
                Ok(1)
            } else {
                Err(CommonError::internal("unreachable state"))
            }
        }
        assert_eq!(check(true), Ok(1));
        assert!(check(false).is_err());
    }
}

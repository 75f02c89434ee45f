//! Error types for the Stratum placement runtime

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Stratum operations.
///
/// Device faults raised mid-dispatch never travel through this enum: a
/// faulted command stream terminates the process (see the fault layer in
/// `stratum-runtime`). The [`Device`](StratumError::Device) variant covers
/// recoverable device *setup* failures only, such as context creation or
/// kernel compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StratumError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A placement descriptor violated an invariant
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Malformed strategy file content
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Device setup errors (context creation, kernel compilation)
    #[error("Device error: {message}")]
    Device { message: String },

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl StratumError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a parse error carrying the 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a device setup error
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check whether the caller can reasonably continue after this error.
    ///
    /// A failed strategy load, for example, leaves the previous store intact
    /// and the run continues; an internal error does not carry that promise.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::Validation { .. }
                | Self::Parse { .. }
                | Self::Io { .. }
                | Self::Device { .. }
        )
    }
}

/// Conversion from std::io::Error
impl From<std::io::Error> for StratumError {
    fn from(err: std::io::Error) -> Self {
        Self::io(format!("{}", err))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_line() {
        let err = StratumError::parse(12, "missing dimension count");
        assert_eq!(
            err.to_string(),
            "Parse error at line 12: missing dimension count"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: StratumError = io.into();
        assert!(matches!(err, StratumError::Io { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_internal_is_not_recoverable() {
        assert!(!StratumError::internal("bookkeeping bug").is_recoverable());
    }
}

//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;

use crate::config::ConfigError;
use crate::data::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    ConfigError,
    StoreError,
    /// Data file failed its integrity check
    DataCorrupted,
    /// Server could not start or stopped with an error
    BootFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "ITEMSVC_CLI_CONFIG_ERROR",
            Self::StoreError => "ITEMSVC_CLI_STORE_ERROR",
            Self::DataCorrupted => "ITEMSVC_CLI_DATA_CORRUPTED",
            Self::BootFailed => "ITEMSVC_CLI_BOOT_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        let code = if e.is_fatal() {
            CliErrorCode::DataCorrupted
        } else {
            CliErrorCode::StoreError
        };
        Self::new(code, format!("{} ({})", e, e.code()))
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::boot_failed("port in use");
        assert_eq!(err.to_string(), "ITEMSVC_CLI_BOOT_FAILED: port in use");
    }

    #[test]
    fn test_store_error_conversion() {
        let err = CliError::from(StoreError::LockPoisoned);
        assert_eq!(err.code(), CliErrorCode::StoreError);
        assert!(err.message().contains("ITEMSVC_STORE_LOCK_POISONED"));

        let err = CliError::from(StoreError::Corruption("checksum mismatch".into()));
        assert_eq!(err.code(), CliErrorCode::DataCorrupted);
    }
}

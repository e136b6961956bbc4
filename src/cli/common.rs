//! Shared CLI types: error kinds and process exit codes.

use thiserror::Error;

/// Process exit codes used by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input or configuration
    ValidationError = 1,
    /// Filesystem failure
    IoError = 2,
    /// Backend unreachable or returned an error
    BackendError = 3,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a CLI command.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// Exit code the process should end with
    pub exit_code: ExitCode,
    /// Human-readable message
    pub message: String,
}

impl CliError {
    /// Invalid arguments or configuration.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Filesystem failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Backend failure.
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            exit_code: ExitCode::BackendError,
            message: message.into(),
        }
    }
}

/// Result alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

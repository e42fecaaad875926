//! Error types for Pulumi CLI queries

use miette::Diagnostic;
use thiserror::Error;

/// Error type for Pulumi data acquisition
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The external CLI could not be spawned or exited non-zero
    #[error("pulumi {command} failed: {message}")]
    #[diagnostic(
        code(statusline::pulumi::command),
        help("Check that the pulumi CLI is installed and logged in")
    )]
    Command {
        /// Subcommand that failed (e.g., "stack ls")
        command: String,
        /// Description of the failure
        message: String,
    },

    /// The external CLI did not finish within the deadline
    #[error("pulumi {command} timed out after {seconds}s")]
    #[diagnostic(code(statusline::pulumi::timeout))]
    Timeout {
        /// Subcommand that timed out
        command: String,
        /// The deadline that was exceeded
        seconds: u64,
    },

    /// The CLI produced output that could not be parsed
    #[error("malformed pulumi output: {message}")]
    #[diagnostic(code(statusline::pulumi::malformed))]
    Malformed {
        /// Description of the parse failure
        message: String,
    },
}

impl Error {
    /// Create a command failure error
    #[must_use]
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(command: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            seconds,
        }
    }

    /// Create a malformed-output error
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Result type for Pulumi data acquisition
pub type Result<T> = std::result::Result<T, Error>;

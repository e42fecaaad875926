//! Error types for the snapshot cache

use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

/// Error type for snapshot cache operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error during cache operations
    #[error("I/O {operation} failed{}", .path.as_ref().map_or_else(String::new, |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(statusline::cache::io),
        help("Check file permissions on the cache directory")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write")
        operation: String,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(code(statusline::cache::serialization))]
    Serialization {
        /// Error message describing the serialization issue
        message: String,
    },
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Create a serialization error
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }
}

/// Result type for snapshot cache operations
pub type Result<T> = std::result::Result<T, Error>;

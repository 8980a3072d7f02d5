//! Error types for groundtruth.

use thiserror::Error;

/// Result type alias using groundtruth's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for groundtruth operations.
///
/// The pure label-set operations never fail; these variants cover the
/// manager's validating entry points and the service boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// No class carries the given label
    #[error("Class not found: {0}")]
    ClassNotFound(String),

    /// Another class already uses the label
    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Training file could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A collaborating service failed
    #[error("Service error: {0}")]
    Service(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

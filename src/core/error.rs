//! Error types and error handling for the Sift tool server.
//!
//! Two families live here. `SiftError` covers ambient failures
//! (configuration, IO during startup, parsing). `SearchError` is the
//! classification the file-search tool reports in-band to callers;
//! its `Display` output is the stable wire message.

use std::io;

use thiserror::Error;

/// Result type alias for Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Main error type for the Sift service
#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SiftError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error came from bad configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            SiftError::ConfigError(_) | SiftError::InvalidPath(_) | SiftError::TomlError(_)
        )
    }
}

/// Failure of a file search, reported in the `error` field of the
/// response rather than as a transport error.
///
/// The messages are part of the wire contract and must not change.
/// None of them include the resolved filesystem path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Requested directory resolves outside the trusted root
    #[error("Access denied: Can only search directories within the project")]
    PolicyViolation,

    #[error("Directory not found")]
    NotFound,

    #[error("Provided path is not a directory")]
    WrongType,

    #[error("Permission denied to access directory")]
    PermissionDenied,

    /// Walk hit the configured entry or depth cap
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    #[error("Search failed: {0}")]
    Unclassified(String),
}

impl SearchError {
    /// Classify an IO failure on the requested directory
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SearchError::NotFound,
            io::ErrorKind::PermissionDenied => SearchError::PermissionDenied,
            io::ErrorKind::NotADirectory => SearchError::WrongType,
            _ => SearchError::Unclassified(err.to_string()),
        }
    }

    /// Check if this error is a sandbox policy violation
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, SearchError::PolicyViolation)
    }
}

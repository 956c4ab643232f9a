//! Error types and result aliases for pack operations.
//!
//! Errors in this enum are the fatal channel of the engine: they abort the
//! operation that raised them. Recoverable incompatibilities found during
//! resolution are recorded as data instead (see `pack-resolver`).

use crate::types::VersionError;
use thiserror::Error;

/// Unified error type for all pack operations
#[derive(Error, Debug)]
pub enum PackError {
    // Version syntax errors
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Invalid version range '{input}'")]
    InvalidRange { input: String },

    // Lookup errors
    #[error("Pack '{name}' not found")]
    PackNotFound { name: String },

    #[error("Pack '{name}' version {found} does not satisfy {required}")]
    VersionMismatch {
        name: String,
        required: String,
        found: String,
    },

    #[error("Pack '{name}' is not installed")]
    NotInstalled { name: String },

    #[error("Invalid pack name '{name}'")]
    InvalidPackName { name: String },

    #[error("Failed to parse manifest {path}: {message}")]
    ManifestParse { path: String, message: String },

    // Config errors
    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for pack operations
pub type PackResult<T> = Result<T, PackError>;

impl PackError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether this error means the pack simply could not be located
    pub fn is_not_found(&self) -> bool {
        matches!(self, PackError::PackNotFound { .. } | PackError::NotInstalled { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            PackError::InvalidVersion { .. } => {
                Some("Versions must look like MAJOR.MINOR.PATCH, e.g. 1.4.0 or 2.0.0-rc.1")
            },
            PackError::InvalidRange { .. } => Some(
                "Use a single range such as 1.2.3, ^1.2.3, ~1.2.3, >=1.2.3, <=1.2.3, >1.2.3 or <1.2.3",
            ),
            PackError::PackNotFound { .. } => {
                Some("Check the pack name spelling or add a source directory with --source")
            },
            PackError::VersionMismatch { .. } => {
                Some("Relax the requested range or make a matching version available")
            },
            PackError::NotInstalled { .. } => Some("Run 'pack list' to see installed packs"),
            PackError::InvalidPackName { .. } => {
                Some("Pack names must be a single directory name without path separators")
            },
            _ => None,
        }
    }
}

impl From<VersionError> for PackError {
    fn from(err: VersionError) -> Self {
        match err {
            VersionError::InvalidVersion { input, reason } => {
                PackError::InvalidVersion { input, reason }
            },
            VersionError::InvalidRange { input } => PackError::InvalidRange { input },
        }
    }
}

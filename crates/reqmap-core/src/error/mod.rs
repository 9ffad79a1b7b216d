//! Error types and result aliases for reqmap operations.
//!
//! Provides a unified error type that covers every failure a configuration
//! request can hit, with actionable error messages.

use thiserror::Error;

/// Unified error type for all reqmap operations
#[derive(Error, Debug)]
pub enum ReqmapError {
    // Config errors
    #[error("Failed to parse {file}: {message}")]
    TomlParse { file: String, message: String },

    #[error("Failed to parse JSON: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Index errors
    #[error("Package '{package}' declares unknown packaging kind '{kind}'")]
    UnknownPackagingKind { package: String, kind: String },

    #[error("Package '{name}' not found in package index")]
    PackageNotFound {
        name: String,
        suggestion: Option<String>,
    },

    // Merge errors (only raised in strict mode)
    #[error("Version conflict: {name} {kept} is configured, but {ignored} is also reachable")]
    VersionConflict {
        name: String,
        kept: String,
        ignored: String,
    },

    #[error("Module identifier '{id}' is claimed by both '{kept}' and '{ignored}'")]
    IdentifierCollision {
        id: String,
        kept: String,
        ignored: String,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for reqmap operations
pub type ReqmapResult<T> = Result<T, ReqmapError>;

impl ReqmapError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a named configuration field
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReqmapError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ReqmapError::PackageNotFound {
                suggestion: Some(close),
                ..
            } => Some(format!("Did you mean '{}'?", close)),
            ReqmapError::PackageNotFound { .. } => {
                Some("Run 'reqmap list' to see the packages in the index".to_string())
            },
            ReqmapError::UnknownPackagingKind { .. } => {
                Some("Packaging kind must be either 'classic' or 'manifest'".to_string())
            },
            ReqmapError::VersionConflict { .. } | ReqmapError::IdentifierCollision { .. } => Some(
                "Drop --strict to accept the first-seen package, or remove the duplicate from the index"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

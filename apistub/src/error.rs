//! Error types for the generator core.
//!
//! Only loading a document can fail. Schema translation, naming and emission
//! are total and have no error type of their own.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Error raised while reading and validating an API description document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document file does not exist.
    #[error("Specification not found: {path}")]
    SpecNotFound { path: PathBuf },

    /// The document file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or YAML.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The document parsed but is not a usable API description.
    #[error("Invalid specification {path}: {reason}")]
    InvalidSpec {
        path: PathBuf,
        #[source]
        reason: DocumentError,
    },
}

/// Structural problem found while decoding a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document root is not an object")]
    RootNotObject,

    #[error("missing `paths`")]
    MissingPaths,

    #[error("`paths` is not an object")]
    PathsNotObject,
}

impl LoadError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::SpecNotFound { path }
    }

    /// Create a parse error.
    pub fn parse(path: PathBuf, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid specification error.
    pub fn invalid(path: PathBuf, reason: DocumentError) -> Self {
        Self::InvalidSpec { path, reason }
    }

    /// Path of the document the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::SpecNotFound { path }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::InvalidSpec { path, .. } => path,
        }
    }
}

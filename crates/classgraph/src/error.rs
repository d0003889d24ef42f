//! Error types for classgraph tooling edges.
//!
//! The diagram stages themselves are total functions. Only loading a project
//! from disk and serializing output can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for classgraph operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type for pipeline I/O and export.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading a project directory or source file failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Serialization error in an exporter
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Underlying error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

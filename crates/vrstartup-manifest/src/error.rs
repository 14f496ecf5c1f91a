//! Manifest error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing or persisting a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No executable path was supplied.
    #[error("no executable path supplied")]
    MissingExecutable,

    /// The manifest document could not be serialized.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The manifest file could not be written.
    #[error("failed to write manifest at {path}: {source}")]
    Write {
        /// Path the manifest was being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

//! Manifest error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the plugin manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// An explicitly requested manifest file does not exist.
    #[error("Manifest file not found: {0}")]
    FileNotFound(PathBuf),

    /// The manifest sources could not be merged or deserialised.
    #[error("Failed to load plugin manifest: {0}")]
    Extract(#[from] figment::Error),
}

/// Result type for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

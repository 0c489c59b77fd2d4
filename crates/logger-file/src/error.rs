//! Error types for file-based logging

use std::io;
use std::path::PathBuf;

/// Result type for file logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during file logging
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to inspect a candidate segment file
    #[error("Failed to probe log segment {path}: {source}")]
    Probe {
        /// The segment that could not be inspected
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to open a segment for appending
    #[error("Failed to open log segment {path}: {source}")]
    Open {
        /// The segment that could not be opened
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Failed to write to the current segment
    #[error("Failed to write log segment {path}: {source}")]
    Write {
        /// The segment being written
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

//! Error types for devplan

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for devplan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for devplan operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Plan document missing or unreadable
    #[error("Cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External program could not be started
    #[error("Failed to run '{program}': {message}")]
    Spawn { program: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

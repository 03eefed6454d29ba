//! Error types for media operations

use std::path::PathBuf;

use thiserror::Error;

/// Result type for media operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from frame extraction and probing
#[derive(Error, Debug)]
pub enum Error {
    /// Input video does not exist
    #[error("Video file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// ffmpeg/ffprobe exited with a nonzero status
    #[error("'{command}' failed: {stderr}")]
    Tool { command: String, stderr: String },

    /// Filesystem error around the output directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the core library (e.g., the tool could not be started)
    #[error(transparent)]
    Core(#[from] devplan_core::Error),
}

//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an import
///
/// Failures of individual `gh issue create` calls are not errors; they are
/// reported per issue in [`crate::SubmitOutcome`].
#[derive(Error, Debug)]
pub enum Error {
    /// Writing the preview or progress output failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid repository reference
    #[error("Invalid repository '{0}'. Expected owner/repo")]
    InvalidRepo(String),
}

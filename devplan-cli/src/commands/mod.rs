//! CLI command implementations

pub mod frames;
pub mod issues;

pub use frames::FramesArgs;
pub use issues::IssuesArgs;

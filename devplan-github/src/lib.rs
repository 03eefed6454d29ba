//! Devplan GitHub - files plan issues on GitHub
//!
//! Issues are created by shelling out to the `gh` CLI, which owns
//! authentication and repository detection.

mod client;
mod create;
mod error;

pub use client::GhClient;
pub use create::{write_preview, ImportOptions, ImportResult, SubmitMode, SubmitOutcome};
pub use error::{Error, Result};

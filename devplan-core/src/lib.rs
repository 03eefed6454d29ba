//! Devplan Core - shared pieces of the devplan tools
//!
//! This crate parses development plan documents into issue records,
//! formats them for filing, and provides the command runner used to
//! drive external tools.

pub mod config;
pub mod error;
pub mod plan;
pub mod process;

pub use config::{CliOverrides, Config, IssuesConfig, MediaConfig};
pub use error::{Error, Result};
pub use plan::{
    format_issue, load_plan, parse_plan, parse_plan_with, BlankLines, FormattedIssue, IssueRecord,
    ParseOptions, DEFAULT_SOURCE_NAME,
};
pub use process::{display_command, CommandOutput, CommandRunner, ProcessRunner};

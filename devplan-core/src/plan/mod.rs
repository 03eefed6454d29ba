//! Plan parsing and issue formatting
//!
//! This module handles parsing of DEV_PLAN.md files into issue records
//! and rendering those records into issue titles and bodies.

mod format;
mod parser;

pub use format::{format_body, format_issue, format_title, FormattedIssue, DEFAULT_SOURCE_NAME};
pub use parser::{load_plan, parse_plan, parse_plan_with, BlankLines, IssueRecord, ParseOptions};

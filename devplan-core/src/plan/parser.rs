//! DEV_PLAN.md parser
//!
//! The document grammar is line oriented:
//!
//! ```text
//! ### Issue 1.2: Title
//! **Labels**: backend, api
//! **Estimate**: 3h
//! Free-form body lines...
//! ```
//!
//! A record stays open until the next `### Issue` heading or the end of the
//! input. Other `##`/`###`/`---` lines inside a record are skipped but do not
//! close it. When a record repeats its labels or estimate line the last one
//! wins.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// One issue parsed from the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Dotted number from the heading (e.g., "1.1")
    pub identifier: String,
    /// Heading text after the identifier
    pub title: String,
    /// Raw body lines in document order
    pub body_lines: Vec<String>,
    /// Labels, empty when the issue declares none
    pub labels: Vec<String>,
    /// Effort estimate, if declared
    pub estimate: Option<String>,
}

impl IssueRecord {
    fn new(identifier: &str, title: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            title: title.trim().to_string(),
            body_lines: Vec::new(),
            labels: Vec::new(),
            estimate: None,
        }
    }

    fn finish(mut self, blank_lines: BlankLines) -> Self {
        if blank_lines == BlankLines::Keep {
            while self.body_lines.last().is_some_and(|l| l.trim().is_empty()) {
                self.body_lines.pop();
            }
        }
        self
    }
}

/// What to do with blank lines once a body has started
///
/// Leading blank lines are always dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLines {
    /// Drop every blank line, bodies come out as one contiguous block
    #[default]
    Drop,
    /// Keep interior blank lines as paragraph separators
    Keep,
}

/// Parser options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub blank_lines: BlankLines,
}

fn issue_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^###\s+Issue\s+([\d.]+):\s+(.+)$").unwrap())
}

fn labels_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\*\*Labels\*\*:\s+(.+)$").unwrap())
}

fn estimate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\*\*Estimate\*\*:\s+(.+)$").unwrap())
}

/// Parse plan content with default options
pub fn parse_plan(content: &str) -> Vec<IssueRecord> {
    parse_plan_with(content, &ParseOptions::default())
}

/// Parse plan content
///
/// Never fails: lines that don't match the grammar are dropped before the
/// first issue and folded into the current body after it.
pub fn parse_plan_with(content: &str, options: &ParseOptions) -> Vec<IssueRecord> {
    let mut issues = Vec::new();
    let mut current: Option<IssueRecord> = None;

    for line in content.lines() {
        if let Some(caps) = issue_heading_re().captures(line) {
            if let Some(done) = current.take() {
                issues.push(done.finish(options.blank_lines));
            }
            current = Some(IssueRecord::new(&caps[1], &caps[2]));
            continue;
        }

        let Some(issue) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = labels_re().captures(line) {
            issue.labels = split_labels(&caps[1]);
            continue;
        }

        if let Some(caps) = estimate_re().captures(line) {
            issue.estimate = Some(caps[1].trim().to_string());
            continue;
        }

        // Section headings and rules between issues are not body content
        if line.starts_with("##") || line.starts_with("---") {
            continue;
        }

        if line.trim().is_empty() {
            // One separator per run of blanks, even across skipped rules
            let after_text = issue.body_lines.last().is_some_and(|l| !l.is_empty());
            if options.blank_lines == BlankLines::Keep && after_text {
                issue.body_lines.push(String::new());
            }
            continue;
        }

        issue.body_lines.push(line.to_string());
    }

    if let Some(done) = current {
        issues.push(done.finish(options.blank_lines));
    }

    issues
}

/// Read and parse a plan document from disk
pub fn load_plan(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Vec<IssueRecord>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let issues = parse_plan_with(&content, options);
    debug!(path = %path.display(), count = issues.len(), "Parsed plan");
    Ok(issues)
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

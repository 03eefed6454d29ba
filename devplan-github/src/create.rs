//! Issue creation from plan

use std::io::Write;

use devplan_core::{format_issue, FormattedIssue, IssueRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{GhClient, Result};

const RULE: &str = "============================================================";

/// Whether to actually file issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitMode {
    /// Print what would be filed, touch nothing
    DryRun,
    /// Run `gh issue create`
    Live,
}

/// Result of submitting one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// Dry run preview was printed
    Previewed,
    /// gh created the issue
    Created { url: String },
    /// gh exited nonzero or could not be started
    Failed { error: String },
}

impl SubmitOutcome {
    /// Dry runs always count as success
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Options for importing a plan
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: SubmitMode,
    /// Plan name quoted in the issue footer
    pub source_name: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: SubmitMode::DryRun,
            source_name: devplan_core::DEFAULT_SOURCE_NAME.to_string(),
        }
    }
}

/// Result of importing a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    /// Number of issues submitted (or previewed)
    pub attempted: usize,
    /// Number that succeeded
    pub succeeded: usize,
    /// Title and URL of each created issue
    pub created: Vec<(String, String)>,
    /// Title and error of each failed issue
    pub failures: Vec<(String, String)>,
}

impl ImportResult {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Write the dry run block for one issue
pub fn write_preview(out: &mut dyn Write, issue: &FormattedIssue) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "ISSUE: {}", issue.title)?;
    writeln!(out, "Labels: {}", issue.labels.join(", "))?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", issue.body)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)
}

fn write_progress(out: &mut dyn Write, title: &str, outcome: &SubmitOutcome) -> std::io::Result<()> {
    match outcome {
        SubmitOutcome::Created { url } => {
            writeln!(out, "✓ Created: {}", title)?;
            writeln!(out, "  URL: {}", url)
        }
        SubmitOutcome::Failed { error } => {
            writeln!(out, "✗ Failed to create: {}", title)?;
            writeln!(out, "  Error: {}", error)
        }
        SubmitOutcome::Previewed => Ok(()),
    }
}

impl GhClient {
    /// Submit one formatted issue
    ///
    /// In live mode, failing to write progress to `out` is logged and does
    /// not change the outcome. A dry run fails if its preview can't be written.
    ///
    /// Not idempotent: submitting the same issue twice files it twice.
    pub async fn submit(
        &self,
        issue: &FormattedIssue,
        mode: SubmitMode,
        out: &mut dyn Write,
    ) -> Result<SubmitOutcome> {
        if mode == SubmitMode::DryRun {
            write_preview(out, issue)?;
            return Ok(SubmitOutcome::Previewed);
        }

        debug!(title = %issue.title, labels = ?issue.labels, "Creating issue");
        let args = self.create_args(issue);

        let outcome = match self.runner().run(self.gh_path(), &args).await {
            Ok(output) if output.is_success() => SubmitOutcome::Created {
                url: output.stdout.trim().to_string(),
            },
            Ok(output) => SubmitOutcome::Failed {
                error: output.stderr.trim().to_string(),
            },
            Err(e) => SubmitOutcome::Failed {
                error: e.to_string(),
            },
        };

        match &outcome {
            SubmitOutcome::Created { url } => {
                info!(title = %issue.title, url = %url, "Created issue");
            }
            SubmitOutcome::Failed { error } => {
                warn!(title = %issue.title, error = %error, "Failed to create issue");
            }
            SubmitOutcome::Previewed => {}
        }

        // Best effort once gh has run
        if let Err(e) = write_progress(out, &issue.title, &outcome) {
            warn!(title = %issue.title, error = %e, "Could not write progress");
        }

        Ok(outcome)
    }

    /// Format and submit every record in document order
    ///
    /// A failed issue is tallied and the loop moves on; nothing is retried.
    pub async fn import_records(
        &self,
        records: &[IssueRecord],
        options: &ImportOptions,
        out: &mut dyn Write,
    ) -> Result<ImportResult> {
        let mut result = ImportResult::default();

        for record in records {
            let issue = format_issue(record, &options.source_name);
            result.attempted += 1;

            match self.submit(&issue, options.mode, out).await? {
                SubmitOutcome::Previewed => result.succeeded += 1,
                SubmitOutcome::Created { url } => {
                    result.succeeded += 1;
                    result.created.push((issue.title, url));
                }
                SubmitOutcome::Failed { error } => {
                    result.failures.push((issue.title, error));
                }
            }
        }

        Ok(result)
    }
}

//! Thin wrapper around the `gh` command line tool

use std::sync::Arc;

use devplan_core::{CommandRunner, FormattedIssue, ProcessRunner};
use tracing::info;

use crate::{Error, Result};

/// Files issues by invoking `gh issue create`
pub struct GhClient {
    runner: Arc<dyn CommandRunner>,
    gh_path: String,
    repo: Option<String>,
}

impl GhClient {
    /// Create a client that runs `gh` from PATH as a real process
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner::new()))
    }

    /// Create a client on top of a specific command runner
    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            gh_path: "gh".to_string(),
            repo: None,
        }
    }

    /// Set a custom path to the gh executable
    pub fn with_gh_path(mut self, path: impl Into<String>) -> Self {
        self.gh_path = path.into();
        self
    }

    /// Target a specific repository instead of the one gh infers from the cwd
    ///
    /// Accepts `owner/repo`, `https://github.com/owner/repo` or
    /// `git@github.com:owner/repo.git`.
    pub fn with_repo(mut self, repo: &str) -> Result<Self> {
        let (owner, name) = parse_github_repo(repo)?;
        info!(owner = %owner, repo = %name, "Targeting repository");
        self.repo = Some(format!("{}/{}", owner, name));
        Ok(self)
    }

    /// Path of the gh executable
    pub fn gh_path(&self) -> &str {
        &self.gh_path
    }

    pub(crate) fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    /// Arguments for `gh` that create `issue`
    pub fn create_args(&self, issue: &FormattedIssue) -> Vec<String> {
        let mut args = vec![
            "issue".to_string(),
            "create".to_string(),
            "--title".to_string(),
            issue.title.clone(),
            "--body".to_string(),
            issue.body.clone(),
        ];

        for label in &issue.labels {
            args.push("--label".to_string());
            args.push(label.clone());
        }

        if let Some(ref repo) = self.repo {
            args.push("--repo".to_string());
            args.push(repo.clone());
        }

        args
    }
}

impl Default for GhClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GhClient")
            .field("gh_path", &self.gh_path)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

/// Parse a repository reference into owner and name
fn parse_github_repo(url: &str) -> Result<(String, String)> {
    let invalid = || Error::InvalidRepo(url.to_string());

    let path = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        // github.com/owner/repo
        rest.split_once('/').map(|(_, p)| p).ok_or_else(invalid)?
    } else if url.starts_with("git@") {
        url.split_once(':').map(|(_, p)| p).ok_or_else(invalid)?
    } else {
        url
    };

    let path = path.trim_matches('/').trim_end_matches(".git");
    let mut parts = path.split('/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(invalid()),
    }
}

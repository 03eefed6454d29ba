//! External command execution
//!
//! Everything devplan does beyond parsing text is delegated to other
//! programs (`gh`, `ffmpeg`, `ffprobe`). They are all invoked through the
//! [`CommandRunner`] trait so callers can substitute a fake in tests.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::{Error, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal
    pub status: Option<i32>,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a process that exited with status 0
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a process that exited with a nonzero status
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0
    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Something that can run a program to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, blocking until it exits
    ///
    /// A nonzero exit status is not an error at this level; callers decide.
    /// Errors are reserved for processes that could not be started.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        debug!(program, command = %display_command(program, args), "Running command");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Spawn {
                program: program.to_string(),
                message: if e.kind() == std::io::ErrorKind::NotFound {
                    "executable not found. Is it installed and on PATH?".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(program, status = ?result.status, "Command finished");
        Ok(result)
    }
}

/// Render a command line for logs and reports (space-joined, unquoted)
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

//! Issues command - file DEV_PLAN.md issues on GitHub

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use devplan_core::{load_plan, BlankLines, Config, ParseOptions, DEFAULT_SOURCE_NAME};
use devplan_github::{GhClient, ImportOptions, ImportResult, SubmitMode};

const RULE: &str = "============================================================";

/// Arguments for the issues command
#[derive(Args, Debug)]
pub struct IssuesArgs {
    /// Path to plan file (defaults to issues.plan_file from config, DEV_PLAN.md)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the issues instead of creating them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Repository (owner/repo format, gh infers it from the cwd if not specified)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Keep blank lines inside issue bodies
    #[arg(long)]
    pub keep_blank_lines: bool,

    /// Exit with an error if any issue failed to be created
    #[arg(long)]
    pub fail_on_error: bool,
}

impl IssuesArgs {
    /// Execute the issues command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        // --file and --repo are already folded into config.issues
        let file = &config.issues.plan_file;
        let repo = config.issues.repo.as_deref();
        let mode = if self.dry_run {
            SubmitMode::DryRun
        } else {
            SubmitMode::Live
        };

        if verbose {
            tracing::info!(
                file = %file.display(),
                ?mode,
                repo = ?repo,
                gh_path = %config.issues.gh_path,
                "Starting issue import"
            );
        }

        if mode == SubmitMode::DryRun {
            println!("DRY RUN MODE - No issues will be created");
            println!();
        }

        println!("Parsing {}...", file.display());
        let options = ParseOptions {
            blank_lines: if self.keep_blank_lines || config.issues.keep_blank_lines {
                BlankLines::Keep
            } else {
                BlankLines::Drop
            },
        };
        let records = load_plan(file, &options)?;

        println!("Found {} issues to create", records.len());
        println!();

        if mode == SubmitMode::Live && !self.yes {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            if !confirm(
                &mut stdin.lock(),
                &mut stdout,
                "Create these issues on GitHub? (y/n): ",
            )? {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let mut client = GhClient::new().with_gh_path(&config.issues.gh_path);
        if let Some(repo) = repo {
            client = client.with_repo(repo)?;
        }

        println!();
        println!("Creating issues...");
        println!();

        let import_options = ImportOptions {
            mode,
            source_name: source_name(file),
        };
        let mut stdout = io::stdout();
        let result = client
            .import_records(&records, &import_options, &mut stdout)
            .await?;

        print_summary(&mut stdout, &result, mode)?;

        if self.fail_on_error && result.failed() > 0 {
            anyhow::bail!("{} of {} issues failed", result.failed(), result.attempted);
        }

        Ok(())
    }
}

/// Ask a yes/no question; only "y" (any case) counts as yes
pub fn confirm(input: &mut dyn BufRead, output: &mut dyn Write, prompt: &str) -> io::Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;

    Ok(response.trim().eq_ignore_ascii_case("y"))
}

/// Plan name used in the issue footer
fn source_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string())
}

fn print_summary(out: &mut dyn Write, result: &ImportResult, mode: SubmitMode) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    match mode {
        SubmitMode::DryRun => writeln!(
            out,
            "DRY RUN: Would have created {}/{} issues",
            result.succeeded, result.attempted
        )?,
        SubmitMode::Live => writeln!(
            out,
            "Successfully created {}/{} issues",
            result.succeeded, result.attempted
        )?,
    }
    writeln!(out, "{}", RULE)
}

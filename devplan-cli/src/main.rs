//! Devplan CLI - file development plan issues and sample video frames
//!
//! Both tools are thin drivers around external programs: `gh` for issues,
//! `ffmpeg`/`ffprobe` for frames.

mod commands;

use clap::{Parser, Subcommand};
use devplan_core::{CliOverrides, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{FramesArgs, IssuesArgs};

/// Devplan: file DEV_PLAN.md issues on GitHub and sample video frames
#[derive(Parser, Debug)]
#[command(name = "devplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to gh executable (overrides config file)
    #[arg(long, global = true, env = "DEVPLAN_GH_PATH")]
    gh_path: Option<String>,

    /// Path to ffmpeg executable (overrides config file)
    #[arg(long, global = true, env = "DEVPLAN_FFMPEG_PATH")]
    ffmpeg_path: Option<String>,

    /// Path to ffprobe executable (overrides config file)
    #[arg(long, global = true, env = "DEVPLAN_FFPROBE_PATH")]
    ffprobe_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show version information
    Version,

    /// Create GitHub issues from a development plan
    #[command(visible_alias = "i")]
    Issues(IssuesArgs),

    /// Extract and inspect video frames
    #[command(visible_alias = "f")]
    Frames(FramesArgs),

    /// Show current configuration
    Config,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let issues = match &self.command {
            Some(Commands::Issues(args)) => Some(args),
            _ => None,
        };

        CliOverrides {
            gh_path: self.gh_path.clone(),
            repo: issues.and_then(|args| args.repo.clone()),
            plan_file: issues.and_then(|args| args.file.clone()),
            ffmpeg_path: self.ffmpeg_path.clone(),
            ffprobe_path: self.ffprobe_path.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise --verbose switches from warnings to debug
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::load_with_overrides(cli.overrides())?;

    if cli.verbose {
        tracing::info!(
            gh_path = %config.issues.gh_path,
            ffmpeg_path = %config.media.ffmpeg_path,
            ffprobe_path = %config.media.ffprobe_path,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("devplan {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Issues(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Frames(args)) => {
            args.execute(cli.verbose, &config).await?;
        }
        Some(Commands::Config) => {
            println!("Devplan Configuration");
            println!("=====================");
            println!();
            println!("Issue Settings:");
            println!("  plan_file: {}", config.issues.plan_file.display());
            println!("  gh_path: {}", config.issues.gh_path);
            println!(
                "  repo: {}",
                config.issues.repo.as_deref().unwrap_or("(current repository)")
            );
            println!("  keep_blank_lines: {}", config.issues.keep_blank_lines);
            println!();
            println!("Media Settings:");
            println!("  ffmpeg_path: {}", config.media.ffmpeg_path);
            println!("  ffprobe_path: {}", config.media.ffprobe_path);
            println!();
            if let Some(path) = Config::default_config_path() {
                println!("Config file: {}", path.display());
                if path.exists() {
                    println!("  (exists)");
                } else {
                    println!("  (not found - using defaults)");
                }
            }
        }
        None => {
            println!("Devplan - file plan issues on GitHub and sample video frames");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

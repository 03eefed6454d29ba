//! Configuration management for devplan
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (DEVPLAN_*)
//! 3. Config file (~/.config/devplan/config.toml)
//! 4. Default values

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Issue import configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IssuesConfig {
    /// Plan document read when no `--file` is given
    pub plan_file: PathBuf,

    /// Path to the gh executable
    pub gh_path: String,

    /// Target repository (owner/repo), gh picks the current repo when unset
    pub repo: Option<String>,

    /// Keep blank lines inside issue bodies instead of dropping them
    pub keep_blank_lines: bool,
}

impl Default for IssuesConfig {
    fn default() -> Self {
        Self {
            plan_file: PathBuf::from("DEV_PLAN.md"),
            gh_path: "gh".to_string(),
            repo: None,
            keep_blank_lines: false,
        }
    }
}

/// Media tool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Path to the ffmpeg executable
    pub ffmpeg_path: String,

    /// Path to the ffprobe executable
    pub ffprobe_path: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Issue import configuration
    pub issues: IssuesConfig,

    /// Media tool configuration
    pub media: MediaConfig,
}

/// Values supplied on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub gh_path: Option<String>,
    pub repo: Option<String>,
    pub plan_file: Option<PathBuf>,
    pub ffmpeg_path: Option<String>,
    pub ffprobe_path: Option<String>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/devplan/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("devplan").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - DEVPLAN_GH_PATH
    /// - DEVPLAN_REPO
    /// - DEVPLAN_PLAN_FILE
    /// - DEVPLAN_FFMPEG_PATH
    /// - DEVPLAN_FFPROBE_PATH
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(gh_path) = lookup("DEVPLAN_GH_PATH") {
            self.issues.gh_path = gh_path;
        }
        if let Some(repo) = lookup("DEVPLAN_REPO") {
            self.issues.repo = Some(repo);
        }
        if let Some(plan_file) = lookup("DEVPLAN_PLAN_FILE") {
            self.issues.plan_file = PathBuf::from(plan_file);
        }
        if let Some(ffmpeg) = lookup("DEVPLAN_FFMPEG_PATH") {
            self.media.ffmpeg_path = ffmpeg;
        }
        if let Some(ffprobe) = lookup("DEVPLAN_FFPROBE_PATH") {
            self.media.ffprobe_path = ffprobe;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(path) = overrides.gh_path {
            self.issues.gh_path = path;
        }
        if let Some(repo) = overrides.repo {
            self.issues.repo = Some(repo);
        }
        if let Some(file) = overrides.plan_file {
            self.issues.plan_file = file;
        }
        if let Some(path) = overrides.ffmpeg_path {
            self.media.ffmpeg_path = path;
        }
        if let Some(path) = overrides.ffprobe_path {
            self.media.ffprobe_path = path;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(overrides: CliOverrides) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(overrides))
    }
}

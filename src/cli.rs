// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::types::ColorChoice;

/// Command-line arguments for `studyplan`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "studyplan",
    version,
    about = "Track progress through a dependency-gated learning plan.",
    long_about = None
)]
pub struct CliArgs {
    /// Plan directory containing `data/config.json` and `data/progress.json`.
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Path to the settings file (TOML).
    ///
    /// Default: `studyplan.toml` inside the plan directory. A missing file
    /// means built-in defaults.
    #[arg(long, value_name = "PATH", global = true)]
    pub settings: Option<PathBuf>,

    /// Colour output (overrides `color` in the settings file).
    #[arg(long, value_enum, value_name = "WHEN", global = true)]
    pub color: Option<ColorChoice>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STUDYPLAN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all tasks.
    List {
        /// Only tasks that can be started right now.
        #[arg(long)]
        today: bool,
    },
    /// Start a task (checks dependencies).
    Start {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Mark a task as complete (logs time).
    Complete {
        #[arg(value_name = "TASK_ID")]
        id: String,
    },
    /// Show the progress dashboard.
    Progress,
    /// Show recommended next tasks.
    Next,
    /// Show learning statistics.
    Stats,
    /// Run a comprehensive health check.
    Check {
        /// Show details for passing checks too.
        #[arg(long)]
        verbose: bool,
    },
    /// Deep diagnostics and analysis.
    Diagnose,
    /// Verify configuration, dependencies (`deps`) or a single task.
    Verify {
        #[arg(value_name = "deps|TASK_ID")]
        target: Option<String>,
    },
    /// Auto-fix common issues.
    Fix {
        /// Preview fixes without applying them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Initialise a new learning plan in the plan directory.
    Init,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

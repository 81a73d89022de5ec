// src/cli.rs

//! CLI argument parsing using `clap` derive.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `surveydag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "surveydag",
    version,
    about = "Validate a survey DAG, enumerate its paths and pick a covering test set.",
    long_about = None
)]
pub struct CliArgs {
    /// Survey document (JSON) to analyse.
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: PathBuf,

    /// Config file (TOML).
    ///
    /// Default: `surveydag.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Stop at the first fatal finding instead of reporting it.
    #[arg(long)]
    pub strict: bool,

    /// Upper bound on enumerated paths.
    #[arg(long, value_name = "N")]
    pub max_paths: Option<usize>,

    /// Upper bound on edges per path.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Wall-clock budget for enumeration, e.g. `500ms`, `30s`, `2m`.
    #[arg(long, value_name = "DURATION")]
    pub time_budget: Option<String>,

    /// Enumeration workers (1 = sequential).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Write output here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit only the analysis report, not the populated document.
    #[arg(long)]
    pub report_only: bool,

    /// Build the graph, print its shape and effective limits, analyse nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SURVEYDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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

// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::StoreBackend;

/// Command-line arguments for `sumwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sumwatch",
    version,
    about = "Watch a drop folder, record a SHA-256 for every new file and write a .sha256 sidecar.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Sumwatch.toml` in the current working directory if it
    /// exists, built-in defaults otherwise.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to watch; overrides `[watch].dir`.
    #[arg(long, value_name = "DIR")]
    pub watch_dir: Option<PathBuf>,

    /// Record store database file; overrides `[store].path`.
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Record store backend (sqlite, memory); overrides `[store].backend`.
    #[arg(long, value_name = "BACKEND")]
    pub store_backend: Option<StoreBackend>,

    /// Also print a line for skipped and already-processed files.
    #[arg(long)]
    pub verbose: bool,

    /// Process the files already in the directory, then exit. No watching.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SUMWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate the config, print the effective settings, and exit.
    #[arg(long)]
    pub dry_run: bool,
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

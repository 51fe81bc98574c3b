// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `cronrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cronrun",
    version,
    about = "Run shell-command jobs on cron schedules, capturing output per run.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, short = 'c', value_name = "PATH", default_value = "Cronrun.toml")]
    pub config: String,

    /// Listening address for the HTTP surface (/ping, /jobs, /metrics).
    #[arg(long, short = 'b', value_name = "ADDR", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CRONRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the config, print the job table, but don't schedule
    /// or execute anything.
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

// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// log_dir = "logs"
/// shell = "/bin/sh"
///
/// [[job]]
/// id = "ping"
/// command = "echo hello"
/// schedule = "* * * * *"
/// ```
///
/// The global sections are optional and have defaults; each `[[job]]` needs
/// at least `id`, `command` and `schedule`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Base directory for the activity log and per-job run logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Shell used for jobs that do not set their own.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// All `[[job]]` entries, in file order.
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            shell: default_shell(),
            jobs: Vec::new(),
        }
    }
}

/// One `[[job]]` record.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Unique, non-empty job identifier. Used in log paths, the activity log
    /// and metric names.
    pub id: String,

    /// The command line to execute, passed to the shell as `shell -c <command>`.
    pub command: String,

    /// Cron expression, five fields (`min hour dom mon dow`) or six with a
    /// leading seconds field.
    pub schedule: String,

    /// Optional working directory for the child process.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Optional per-job shell override.
    #[serde(default)]
    pub shell: Option<String>,

    /// Optional explicit environment as `KEY=VALUE` strings.
    ///
    /// When non-empty, the child runs with exactly this environment instead
    /// of inheriting the process environment.
    #[serde(default)]
    pub env: Vec<String>,

    /// Retry count. Parsed and exposed in the read model, but retry-on-failure
    /// is not executed by the runtime.
    #[serde(default)]
    pub retry: u32,
}

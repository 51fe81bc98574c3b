// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! The variants mirror the runtime's failure taxonomy: configuration and
//! setup problems abort startup, launch/execution problems fail a single
//! run, and activity-log problems are reported without failing the run
//! they were logging.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CronrunError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid schedule for job '{id}': {source}")]
    Schedule {
        id: String,
        #[source]
        source: cron::error::Error,
    },

    #[error("Failed to launch job '{id}': {source}")]
    Launch {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Job '{id}' execution failed: {detail}")]
    Execution { id: String, detail: String },

    #[error("Activity log append failed: {0}")]
    Activity(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CronrunError>;

// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::ConfigFile;
use crate::errors::{CronrunError, Result};
use crate::sched::parse_schedule;

/// Semantic validation of a parsed config.
///
/// Everything checked here is startup-fatal: a config that fails validation
/// never reaches the scheduler.
pub fn validate(cfg: &ConfigFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_job_ids(cfg)?;
    validate_commands(cfg)?;
    validate_schedules(cfg)?;
    Ok(())
}

fn ensure_has_jobs(cfg: &ConfigFile) -> Result<()> {
    if cfg.jobs.is_empty() {
        return Err(CronrunError::Config(
            "config must contain at least one [[job]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_job_ids(cfg: &ConfigFile) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();

    for job in cfg.jobs.iter() {
        if job.id.trim().is_empty() {
            return Err(CronrunError::Config(
                "job id must be a non-empty string".to_string(),
            ));
        }
        if !seen.insert(job.id.as_str()) {
            return Err(CronrunError::Config(format!(
                "duplicate job id '{}'",
                job.id
            )));
        }
    }
    Ok(())
}

fn validate_commands(cfg: &ConfigFile) -> Result<()> {
    for job in cfg.jobs.iter() {
        if job.command.trim().is_empty() {
            return Err(CronrunError::Config(format!(
                "job '{}' has an empty command",
                job.id
            )));
        }
    }
    Ok(())
}

fn validate_schedules(cfg: &ConfigFile) -> Result<()> {
    for job in cfg.jobs.iter() {
        // Parsed again at scheduler startup; this catches bad expressions
        // before anything else is set up.
        parse_schedule(&job.id, &job.schedule)?;
    }
    Ok(())
}

// src/sched/mod.rs

//! Cron schedule parsing and per-job timer loops.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{CronrunError, Result};
use crate::job::registry::{JobEntry, JobRegistry};
use crate::trigger::{handle_trigger, RunContext};

/// Parse a job's cron expression.
///
/// The `cron` crate requires a seconds field; standard five-field
/// expressions (`min hour dom mon dow`) are accepted by prepending `0`
/// for seconds.
pub fn parse_schedule(id: &str, expr: &str) -> Result<Schedule> {
    let expr = expr.trim();
    let normalized = if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    };

    Schedule::from_str(&normalized).map_err(|source| CronrunError::Schedule {
        id: id.to_string(),
        source,
    })
}

/// Spawn one timer loop per job.
///
/// Schedules were already validated at config load; a parse failure here is
/// still returned as an error rather than panicking.
pub fn spawn_schedules(
    ctx: Arc<RunContext>,
    registry: &JobRegistry,
) -> Result<Vec<JoinHandle<()>>> {
    let mut handles = Vec::new();

    for entry in registry.entries() {
        let def = entry.definition();
        let schedule = parse_schedule(&def.id, &def.schedule)?;
        info!(job = %def.id, schedule = %def.schedule, "scheduling job");
        handles.push(tokio::spawn(schedule_loop(
            schedule,
            ctx.clone(),
            entry.clone(),
        )));
    }

    Ok(handles)
}

/// Sleep until each upcoming tick and fire the trigger handler.
///
/// Each fire is spawned as its own task, so a slow run never delays the next
/// tick; overlapping runs of the same job are allowed by design. Triggers of
/// different jobs are not ordered against each other.
async fn schedule_loop(schedule: Schedule, ctx: Arc<RunContext>, entry: Arc<JobEntry>) {
    let id = entry.definition().id.clone();
    let mut upcoming = schedule.upcoming(Utc);

    loop {
        let Some(next) = upcoming.next() else {
            warn!(job = %id, "schedule has no upcoming fire time; stopping");
            break;
        };

        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::time::sleep(wait).await;

        debug!(job = %id, fired_at = %next, "schedule fired");
        tokio::spawn(handle_trigger(ctx.clone(), entry.clone()));
    }
}

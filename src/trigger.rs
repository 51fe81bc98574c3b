// src/trigger.rs

//! Per-fire orchestration: one scheduler tick for one job.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::activity::ActivityLog;
use crate::errors::Result;
use crate::job::record::{RunRecord, RunStatus};
use crate::job::registry::JobEntry;

/// Shared context passed explicitly to every trigger invocation: the log
/// base directory and the open activity log handle. No process-wide globals.
#[derive(Debug)]
pub struct RunContext {
    pub log_dir: PathBuf,
    pub activity: ActivityLog,
}

/// Handle one scheduler fire for one job.
///
/// Every error in here is contained: it is logged and counted, and never
/// propagates to the scheduler loop or to other jobs. Overlapping fires of
/// the same job run concurrently against the same entry; each gets its own
/// record and its own run-unique log files, and the entry's last-run slot is
/// last-writer-wins.
pub async fn handle_trigger(ctx: Arc<RunContext>, entry: Arc<JobEntry>) {
    let id = entry.definition().id.clone();
    entry.mark_triggered();

    match run_once(&ctx, &entry).await {
        Ok(RunStatus::Succeeded) => entry.record_success(),
        Ok(status) => {
            info!(job = %id, %status, "run finished unsuccessfully");
            entry.record_failure();
        }
        Err(err) => {
            // Setup failure before a record could even run.
            error!(job = %id, error = %err, "trigger failed");
            entry.record_failure();
        }
    }
}

/// One run attempt: set up log paths, record the START event, execute, and
/// record the outcome. Returns the record's terminal status, or an error if
/// the run could not be set up at all.
async fn run_once(ctx: &RunContext, entry: &JobEntry) -> Result<RunStatus> {
    let def = entry.definition();
    let seq = entry.next_run_seq();

    let job_log_dir = ctx.log_dir.join(&def.id);
    tokio::fs::create_dir_all(&job_log_dir).await?;

    // Timestamp plus per-entry sequence number keeps paths unique even when
    // overlapping runs start within the same millisecond.
    let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3fZ");
    let stdout_path = job_log_dir.join(format!("{}-{}-{}.stdout.txt", def.id, stamp, seq));
    let stderr_path = job_log_dir.join(format!("{}-{}-{}.stderr.txt", def.id, stamp, seq));

    append_event(ctx, &def.id, "START").await;

    let record = Arc::new(RunRecord::new(
        def.id.clone(),
        def.command.clone(),
        def.shell.clone(),
        def.env.clone(),
        def.working_dir.clone(),
        stdout_path,
        stderr_path,
    ));

    // Published before running, so readers can observe the RUNNING state.
    entry.set_last_run(record.clone());

    if let Err(err) = record.run().await {
        error!(job = %def.id, error = %err, "job run failed");
    }

    let status = record.status();
    append_event(ctx, &def.id, &format!("LastRunStatus={status}")).await;

    Ok(status)
}

/// Append to the activity log, containing any failure: a reporting error
/// never fails the run it was reporting on.
async fn append_event(ctx: &RunContext, job_id: &str, event: &str) {
    if let Err(err) = ctx.activity.append(job_id, event).await {
        warn!(job = %job_id, event, error = %err, "activity log append failed");
    }
}

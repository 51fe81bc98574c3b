// src/job/record.rs

//! The record of a single execution attempt.

use std::fmt;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;

/// Lifecycle status of one run.
///
/// Transitions are monotonic: `NotStarted -> Running -> {Succeeded | Failed}`.
/// A terminal status never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::NotStarted => "NOT_STARTED",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// One execution attempt of a job.
///
/// The command, shell, environment and working directory are snapshotted from
/// the job definition at trigger time, so a record of a past run is never
/// affected by later changes. Timing and status live behind a lock; readers
/// go through [`RunRecord::snapshot`] and always observe a consistent state.
///
/// `run()` must be called at most once per record. Each trigger constructs a
/// fresh record; old records are superseded, never mutated again once
/// terminal.
#[derive(Debug)]
pub struct RunRecord {
    pub job_id: String,
    pub command: String,
    pub shell: String,
    pub env: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    state: RwLock<RunState>,
}

#[derive(Debug, Clone)]
struct RunState {
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    duration_ms: Option<i64>,
}

/// Owned, consistent copy of a record's observable state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub status: RunStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
}

impl RunRecord {
    pub fn new(
        job_id: impl Into<String>,
        command: impl Into<String>,
        shell: impl Into<String>,
        env: Vec<String>,
        working_dir: Option<PathBuf>,
        stdout_path: PathBuf,
        stderr_path: PathBuf,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            command: command.into(),
            shell: shell.into(),
            env,
            working_dir,
            stdout_path,
            stderr_path,
            state: RwLock::new(RunState {
                status: RunStatus::NotStarted,
                started_at: None,
                finished_at: None,
                duration_ms: None,
            }),
        }
    }

    /// Execute this record's command and drive the status state machine.
    ///
    /// Stamps the start time on entry to `Running`, invokes the executor,
    /// then stamps the end time and duration on entry to the terminal state.
    /// The returned error (if any) is the executor's launch or execution
    /// error; the terminal status already reflects it.
    pub async fn run(&self) -> Result<()> {
        self.mark_running();
        let result = crate::exec::execute(self).await;
        self.finish(result.is_ok());
        result
    }

    pub fn status(&self) -> RunStatus {
        self.read_state().status
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let state = self.read_state();
        RunSnapshot {
            status: state.status,
            start_time: state.started_at,
            end_time: state.finished_at,
            duration_ms: state.duration_ms,
            stdout_path: self.stdout_path.clone(),
            stderr_path: self.stderr_path.clone(),
        }
    }

    fn mark_running(&self) {
        let mut state = self.write_state();
        debug_assert_eq!(state.status, RunStatus::NotStarted, "run() called twice");
        state.status = RunStatus::Running;
        state.started_at = Some(Utc::now());
    }

    fn finish(&self, succeeded: bool) {
        let mut state = self.write_state();
        if state.status.is_terminal() {
            return;
        }
        let finished_at = Utc::now();
        state.status = if succeeded {
            RunStatus::Succeeded
        } else {
            RunStatus::Failed
        };
        state.finished_at = Some(finished_at);
        state.duration_ms = state
            .started_at
            .map(|start| (finished_at - start).num_milliseconds());
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RunState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RunState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

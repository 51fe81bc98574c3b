// src/job/registry.rs

//! Long-lived per-job state: definition, counters and the most recent run.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::config::model::{ConfigFile, JobConfig};
use crate::job::record::{RunRecord, RunSnapshot};

/// Immutable job definition, resolved from config at startup.
///
/// `shell` is already resolved here: the per-job override if present,
/// otherwise the config-level default.
#[derive(Debug, Clone)]
pub struct JobDefinition {
    pub id: String,
    pub command: String,
    pub schedule: String,
    pub shell: String,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<String>,
    pub retry: u32,
}

impl JobDefinition {
    pub fn from_config(job: &JobConfig, default_shell: &str) -> Self {
        Self {
            id: job.id.clone(),
            command: job.command.clone(),
            schedule: job.schedule.clone(),
            shell: job
                .shell
                .clone()
                .unwrap_or_else(|| default_shell.to_string()),
            working_dir: job.working_dir.clone(),
            env: job.env.clone(),
            retry: job.retry,
        }
    }
}

/// One entry per job definition, alive for the whole process.
///
/// Counters are atomics because overlapping triggers of the same job are
/// allowed: two runs may finish concurrently and both update the same entry.
/// The `last_run` slot has last-writer-wins semantics under overlap; each
/// run's own record stays internally consistent regardless.
#[derive(Debug)]
pub struct JobEntry {
    def: JobDefinition,
    runs_total: AtomicU64,
    runs_succeeded: AtomicU64,
    runs_failed: AtomicU64,
    run_seq: AtomicU64,
    last_run: RwLock<Option<Arc<RunRecord>>>,
}

impl JobEntry {
    pub fn new(def: JobDefinition) -> Self {
        Self {
            def,
            runs_total: AtomicU64::new(0),
            runs_succeeded: AtomicU64::new(0),
            runs_failed: AtomicU64::new(0),
            run_seq: AtomicU64::new(0),
            last_run: RwLock::new(None),
        }
    }

    pub fn definition(&self) -> &JobDefinition {
        &self.def
    }

    /// Count one trigger fire. Called once at trigger entry, before the
    /// outcome is known.
    pub fn mark_triggered(&self) {
        self.runs_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Next per-entry run sequence number, used to keep log paths unique
    /// across overlapping runs triggered within the same timestamp.
    pub fn next_run_seq(&self) -> u64 {
        self.run_seq.fetch_add(1, Ordering::Relaxed)
    }

    pub fn record_success(&self) {
        self.runs_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Publish a record as the most recent run. Visible to readers
    /// immediately, including while the run is still `RUNNING`.
    pub fn set_last_run(&self, record: Arc<RunRecord>) {
        let mut slot = self.last_run.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(record);
    }

    pub fn last_run(&self) -> Option<Arc<RunRecord>> {
        self.last_run
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn runs_total(&self) -> u64 {
        self.runs_total.load(Ordering::Relaxed)
    }

    pub fn runs_succeeded(&self) -> u64 {
        self.runs_succeeded.load(Ordering::Relaxed)
    }

    pub fn runs_failed(&self) -> u64 {
        self.runs_failed.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            id: self.def.id.clone(),
            command: self.def.command.clone(),
            schedule: self.def.schedule.clone(),
            retry: self.def.retry,
            success_count: self.runs_succeeded(),
            failure_count: self.runs_failed(),
            last_run: self.last_run().map(|record| record.snapshot()),
        }
    }
}

/// Serializable read model for one job, served over `/jobs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    pub id: String,
    pub command: String,
    pub schedule: String,
    pub retry: u32,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_run: Option<RunSnapshot>,
}

/// All job entries, in config order.
#[derive(Debug)]
pub struct JobRegistry {
    entries: Vec<Arc<JobEntry>>,
}

impl JobRegistry {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let entries = cfg
            .jobs
            .iter()
            .map(|job| Arc::new(JobEntry::new(JobDefinition::from_config(job, &cfg.shell))))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = &Arc<JobEntry>> {
        self.entries.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<JobEntry>> {
        self.entries.iter().find(|e| e.definition().id == id)
    }

    pub fn snapshots(&self) -> Vec<JobSnapshot> {
        self.entries.iter().map(|e| e.snapshot()).collect()
    }
}

// src/activity.rs

//! Shared append-only activity log for the whole process.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::{CronrunError, Result};

/// One append-only event log shared by every trigger in the process.
///
/// Line format: `<RFC3339>\t<jobId>\t<event>`, where `event` is `START` or
/// `LastRunStatus=<SUCCEEDED|FAILED>`. The write+sync pair is serialized
/// behind a mutex so concurrent triggers always produce whole lines.
#[derive(Debug)]
pub struct ActivityLog {
    file: Mutex<File>,
}

impl ActivityLog {
    /// Open (append-create) the activity log. Failure here is startup-fatal
    /// for the caller.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path.as_ref())
            .await?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Append one event line and sync it to stable storage.
    pub async fn append(&self, job_id: &str, event: &str) -> Result<()> {
        let line = format!(
            "{}\t{}\t{}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            job_id,
            event
        );

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(CronrunError::Activity)?;
        file.sync_data().await.map_err(CronrunError::Activity)?;
        Ok(())
    }
}

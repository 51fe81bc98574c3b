// src/exec/runner.rs

//! Run executor: spawn one child process and capture both output streams.

use std::process::Stdio;

use tokio::io::AsyncRead;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::errors::{CronrunError, Result};
use crate::exec::sink::drain_to_file;
use crate::job::record::RunRecord;

/// Execute a run record's command: spawn `shell -c <command>`, drain stdout
/// and stderr concurrently into the record's log files, and wait for exit.
///
/// The call returns only after the process has exited *and* both drains have
/// completed, so no output is lost to a full pipe buffer. Failure modes:
///
/// - spawn failure (missing shell, bad working dir) -> [`CronrunError::Launch`];
/// - non-zero exit -> [`CronrunError::Execution`] carrying the exit code;
/// - a drain error observed after exit -> [`CronrunError::Execution`]. Drain
///   errors never abort the running child; they are surfaced once it exits.
///
/// No timeout is imposed here.
pub async fn execute(record: &RunRecord) -> Result<()> {
    debug!(
        job = %record.job_id,
        shell = %record.shell,
        cmd = %record.command,
        "spawning job process"
    );

    let mut cmd = Command::new(&record.shell);
    cmd.arg("-c")
        .arg(&record.command)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = &record.working_dir {
        cmd.current_dir(dir);
    }

    // An explicit env list replaces the inherited environment entirely.
    if !record.env.is_empty() {
        cmd.env_clear();
        for pair in &record.env {
            if let Some((key, value)) = pair.split_once('=') {
                cmd.env(key, value);
            }
        }
    }

    let mut child = cmd.spawn().map_err(|source| CronrunError::Launch {
        id: record.job_id.clone(),
        source,
    })?;

    // Both drains are attached before we wait on the child, so the child can
    // never stall on a full pipe.
    let stdout_drain = spawn_drain(child.stdout.take(), record.stdout_path.clone());
    let stderr_drain = spawn_drain(child.stderr.take(), record.stderr_path.clone());

    let status = child.wait().await?;

    // Rendezvous: both drains must have finished before we report.
    let stdout_failure = drain_failure(record, "stdout", stdout_drain.await);
    let stderr_failure = drain_failure(record, "stderr", stderr_drain.await);

    if !status.success() {
        return Err(CronrunError::Execution {
            id: record.job_id.clone(),
            detail: format!("exited with code {}", status.code().unwrap_or(-1)),
        });
    }

    if let Some(detail) = stdout_failure.or(stderr_failure) {
        return Err(CronrunError::Execution {
            id: record.job_id.clone(),
            detail,
        });
    }

    Ok(())
}

fn spawn_drain<R>(stream: Option<R>, path: std::path::PathBuf) -> JoinHandle<Result<()>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        match stream {
            Some(stream) => drain_to_file(stream, &path).await,
            None => Ok(()),
        }
    })
}

/// Turn a joined drain result into an optional failure detail, logging it.
fn drain_failure(
    record: &RunRecord,
    stream: &str,
    joined: std::result::Result<Result<()>, tokio::task::JoinError>,
) -> Option<String> {
    match joined {
        Ok(Ok(())) => None,
        Ok(Err(err)) => {
            error!(job = %record.job_id, stream, error = %err, "stream capture failed");
            Some(format!("{stream} capture failed: {err}"))
        }
        Err(err) => {
            error!(job = %record.job_id, stream, error = %err, "stream capture task panicked");
            Some(format!("{stream} capture task panicked: {err}"))
        }
    }
}

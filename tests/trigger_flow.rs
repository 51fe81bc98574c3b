// tests/trigger_flow.rs

mod common;

use std::sync::Arc;

use cronrun::activity::ActivityLog;
use cronrun::job::{JobDefinition, JobEntry, RunStatus};
use cronrun::trigger::{handle_trigger, RunContext};
use tempfile::TempDir;

fn definition(id: &str, command: &str) -> JobDefinition {
    JobDefinition {
        id: id.to_string(),
        command: command.to_string(),
        schedule: "* * * * *".to_string(),
        shell: "/bin/sh".to_string(),
        working_dir: None,
        env: Vec::new(),
        retry: 0,
    }
}

async fn context(dir: &TempDir) -> Arc<RunContext> {
    let log_dir = dir.path().join("logs");
    tokio::fs::create_dir_all(&log_dir).await.unwrap();
    let activity = ActivityLog::open(log_dir.join("activity.log")).await.unwrap();
    Arc::new(RunContext { log_dir, activity })
}

fn activity_lines(ctx: &RunContext) -> Vec<String> {
    std::fs::read_to_string(ctx.log_dir.join("activity.log"))
        .unwrap_or_default()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[tokio::test]
async fn ping_scenario_end_to_end() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).await;
    let entry = Arc::new(JobEntry::new(definition("ping", "echo hello")));

    handle_trigger(ctx.clone(), entry.clone()).await;

    // Exactly one terminal record, counted as a success.
    let snap = entry.snapshot();
    assert_eq!(snap.success_count, 1);
    assert_eq!(snap.failure_count, 0);
    assert_eq!(entry.runs_total(), 1);

    let last = snap.last_run.expect("last run published");
    assert_eq!(last.status, RunStatus::Succeeded);
    assert!(last.duration_ms.unwrap() >= 0);

    // stdout log: one line ending in "hello"; stderr log: empty.
    let stdout = std::fs::read_to_string(&last.stdout_path).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("hello"));
    assert_eq!(
        std::fs::read_to_string(&last.stderr_path).unwrap().len(),
        0
    );

    // Activity log: START then LastRunStatus, tab-separated.
    let activity = activity_lines(&ctx);
    assert_eq!(activity.len(), 2);
    let start: Vec<_> = activity[0].split('\t').collect();
    assert_eq!(start.len(), 3);
    assert_eq!(start[1], "ping");
    assert_eq!(start[2], "START");
    let status: Vec<_> = activity[1].split('\t').collect();
    assert_eq!(status[1], "ping");
    assert_eq!(status[2], "LastRunStatus=SUCCEEDED");
}

#[tokio::test]
async fn failing_command_increments_failure_counter_once() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).await;
    let entry = Arc::new(JobEntry::new(definition("flaky", "exit 1")));

    handle_trigger(ctx.clone(), entry.clone()).await;

    assert_eq!(entry.runs_succeeded(), 0);
    assert_eq!(entry.runs_failed(), 1);
    assert_eq!(
        entry.last_run().unwrap().status(),
        RunStatus::Failed
    );

    let activity = activity_lines(&ctx);
    assert_eq!(activity.last().unwrap().split('\t').last().unwrap(), "LastRunStatus=FAILED");
}

#[tokio::test]
async fn missing_executable_fails_without_crashing_the_handler() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).await;
    let entry = Arc::new(JobEntry::new(definition(
        "ghost",
        "definitely-not-a-real-command-xyz",
    )));

    handle_trigger(ctx.clone(), entry.clone()).await;

    assert_eq!(entry.runs_failed(), 1);
    let last = entry.last_run().unwrap().snapshot();
    assert_eq!(last.status, RunStatus::Failed);

    // The shell spawned but the command did not; stdout captured nothing.
    let stdout = std::fs::read_to_string(&last.stdout_path).unwrap_or_default();
    assert!(stdout.is_empty());
}

#[tokio::test]
async fn sequential_triggers_sum_counters_exactly() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).await;
    let good = Arc::new(JobEntry::new(definition("good", "true")));
    let bad = Arc::new(JobEntry::new(definition("bad", "false")));

    for _ in 0..3 {
        handle_trigger(ctx.clone(), good.clone()).await;
    }
    for _ in 0..2 {
        handle_trigger(ctx.clone(), bad.clone()).await;
    }

    assert_eq!(good.runs_succeeded() + good.runs_failed(), 3);
    assert_eq!(good.runs_succeeded(), 3);
    assert_eq!(bad.runs_succeeded() + bad.runs_failed(), 2);
    assert_eq!(bad.runs_failed(), 2);
}

#[tokio::test]
async fn concurrent_triggers_produce_independent_records() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir).await;
    let entry = Arc::new(JobEntry::new(definition(
        "overlap",
        "sleep 0.2 && echo done",
    )));

    tokio::join!(
        handle_trigger(ctx.clone(), entry.clone()),
        handle_trigger(ctx.clone(), entry.clone()),
    );

    assert_eq!(entry.runs_total(), 2);
    assert_eq!(entry.runs_succeeded(), 2);

    // Each run got its own run-unique log files.
    let job_dir = ctx.log_dir.join("overlap");
    let stdout_files: Vec<_> = std::fs::read_dir(&job_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".stdout.txt"))
        .collect();
    assert_eq!(stdout_files.len(), 2);

    for file in stdout_files {
        let content = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("done"));
    }

    // The last-run slot reflects one of the two; either way it is terminal.
    assert!(entry.last_run().unwrap().status().is_terminal());
}

#[tokio::test]
async fn log_dir_setup_failure_fails_only_the_trigger() {
    common::init_tracing();
    let dir = TempDir::new().unwrap();

    // A file where the log base dir should be makes job-dir creation fail.
    let blocked = dir.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();
    let activity = ActivityLog::open(dir.path().join("activity.log")).await.unwrap();
    let ctx = Arc::new(RunContext {
        log_dir: blocked,
        activity,
    });

    let entry = Arc::new(JobEntry::new(definition("doomed", "echo hi")));
    handle_trigger(ctx.clone(), entry.clone()).await;

    // Contained: counted as a failed trigger, no record was ever published.
    assert_eq!(entry.runs_total(), 1);
    assert_eq!(entry.runs_failed(), 1);
    assert!(entry.last_run().is_none());
}

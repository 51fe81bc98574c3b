// src/lib.rs

pub mod activity;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod http;
pub mod job;
pub mod logging;
pub mod sched;
pub mod trigger;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::activity::ActivityLog;
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::job::registry::JobRegistry;
use crate::trigger::RunContext;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + validation
/// - the log directory and shared activity log
/// - the job registry
/// - per-job cron timer loops
/// - the HTTP surface
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    // Setup errors here are fatal: without the log dir and activity log
    // nothing can run.
    tokio::fs::create_dir_all(&cfg.log_dir).await?;
    let activity = ActivityLog::open(cfg.log_dir.join("activity.log")).await?;

    let registry = Arc::new(JobRegistry::from_config(&cfg));
    let ctx = Arc::new(RunContext {
        log_dir: cfg.log_dir.clone(),
        activity,
    });

    let _timers = sched::spawn_schedules(ctx, &registry)?;

    tokio::select! {
        res = http::serve(args.bind, registry.clone()) => {
            res?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
        }
    }

    Ok(())
}

/// Simple dry-run output: print jobs, schedules and commands.
fn print_dry_run(cfg: &ConfigFile) {
    println!("cronrun dry-run");
    println!("  log_dir = {}", cfg.log_dir.display());
    println!("  shell = {}", cfg.shell);
    println!();

    println!("jobs ({}):", cfg.jobs.len());
    for job in cfg.jobs.iter() {
        println!("  - {}", job.id);
        println!("      command: {}", job.command);
        println!("      schedule: {}", job.schedule);
        if let Some(ref dir) = job.working_dir {
            println!("      working_dir: {}", dir.display());
        }
        if let Some(ref shell) = job.shell {
            println!("      shell: {shell}");
        }
        if !job.env.is_empty() {
            println!("      env: {:?}", job.env);
        }
        if job.retry > 0 {
            println!("      retry: {} (not executed)", job.retry);
        }
    }
}

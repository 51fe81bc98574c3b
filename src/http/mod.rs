// src/http/mod.rs

//! HTTP surface: health ping, job snapshots and Prometheus-style metrics.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::errors::Result;
use crate::job::registry::{JobRegistry, JobSnapshot};

pub fn router(registry: Arc<JobRegistry>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/jobs", get(jobs))
        .route("/metrics", get(metrics))
        .with_state(registry)
}

/// Bind and serve until the caller drops the future.
pub async fn serve(bind: String, registry: Arc<JobRegistry>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "http server listening");
    axum::serve(listener, router(registry)).await?;
    Ok(())
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "message": "pong" }))
}

/// Snapshot read model: safe to call while runs are in flight; every job
/// snapshot is taken atomically per record.
async fn jobs(State(registry): State<Arc<JobRegistry>>) -> Json<Vec<JobSnapshot>> {
    Json(registry.snapshots())
}

async fn metrics(State(registry): State<Arc<JobRegistry>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(&registry),
    )
}

/// Render the per-job run counters in Prometheus text exposition format.
pub fn render_metrics(registry: &JobRegistry) -> String {
    let mut out = String::new();

    render_counter(
        &mut out,
        registry,
        "cronrun_job_runs_total",
        "Total trigger fires per job.",
        |e| e.runs_total(),
    );
    render_counter(
        &mut out,
        registry,
        "cronrun_job_runs_succeeded",
        "Runs that finished successfully, per job.",
        |e| e.runs_succeeded(),
    );
    render_counter(
        &mut out,
        registry,
        "cronrun_job_runs_failed",
        "Runs that failed, per job.",
        |e| e.runs_failed(),
    );

    out
}

fn render_counter(
    out: &mut String,
    registry: &JobRegistry,
    name: &str,
    help: &str,
    value: impl Fn(&crate::job::registry::JobEntry) -> u64,
) {
    out.push_str(&format!("# HELP {name} {help}\n"));
    out.push_str(&format!("# TYPE {name} counter\n"));
    for entry in registry.entries() {
        out.push_str(&format!(
            "{name}{{job=\"{}\"}} {}\n",
            entry.definition().id,
            value(entry.as_ref())
        ));
    }
}

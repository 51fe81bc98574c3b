// src/job/mod.rs

//! Job definitions, per-job registry entries and run records.

pub mod record;
pub mod registry;

pub use record::{RunRecord, RunSnapshot, RunStatus};
pub use registry::{JobDefinition, JobEntry, JobRegistry, JobSnapshot};

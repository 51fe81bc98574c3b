// src/exec/mod.rs

//! Child process execution and output capture.

pub mod runner;
pub mod sink;

pub use runner::execute;
pub use sink::drain_to_file;

// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for running the refinement executable against
//! a patched template, using `tokio::process::Command`.
//!
//! - [`process`] spawns the tool, enforces the wall-clock timeout and
//!   collects both output streams.
//! - [`output`] holds the captured result of one run.
//! - [`scratch`] owns the per-pattern scratch script and its `.out` file.
//! - [`backend`] provides the `ToolRunner` trait and the concrete
//!   `RealToolRunner` used in production, which tests replace with a fake.

pub mod backend;
pub mod output;
pub mod process;
pub mod scratch;

pub use backend::{RealToolRunner, ToolRequest, ToolRunner};
pub use output::ToolOutput;
pub use process::{run_tool, DEFAULT_TIMEOUT};
pub use scratch::{ScratchScript, OUTPUT_EXTENSION, SCRIPT_EXTENSION};

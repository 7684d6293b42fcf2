// src/exec/backend.rs

//! Pluggable tool runner abstraction.
//!
//! The orchestrator talks to a `ToolRunner` instead of spawning processes
//! directly. Production code uses [`RealToolRunner`]; tests provide a fake
//! that writes a canned `.out` file instead of launching TOPAS.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;
use crate::exec::output::ToolOutput;
use crate::exec::process::run_tool;

/// One invocation of the refinement executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRequest {
    pub program: PathBuf,
    pub script: PathBuf,
    pub timeout: Duration,
}

/// Trait abstracting how the refinement executable is run.
pub trait ToolRunner: Send {
    /// Run the tool once.
    ///
    /// A timeout is reported through [`ToolOutput::timed_out`]; an `Err` means
    /// the process could not be run at all and aborts the task.
    fn run(
        &mut self,
        request: ToolRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ToolOutput>> + Send + '_>>;
}

/// Runner that spawns real OS processes.
#[derive(Debug, Clone, Default)]
pub struct RealToolRunner;

impl ToolRunner for RealToolRunner {
    fn run(
        &mut self,
        request: ToolRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ToolOutput>> + Send + '_>> {
        Box::pin(async move { run_tool(&request.program, &request.script, request.timeout).await })
    }
}

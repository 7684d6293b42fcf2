// src/engine/mod.rs

//! Orchestration engine.
//!
//! The [`Orchestrator`] owns the task registry and drives the pipeline for
//! one task or for all of them: patch template → run tool → extract row,
//! for each pattern in turn, then append the rows to the report.
//!
//! Observers receive [`TaskEvent`]s over an optional channel instead of
//! reading registry internals.

use std::path::PathBuf;

use crate::types::{TaskId, TaskState};

pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{Orchestrator, OrchestratorOptions};
pub use prompt::{NoOutputPrompt, OutputPrompt, StdinOutputPrompt};

/// What processing one task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The task had no patterns; nothing was run or written.
    NothingToDo,
    /// All patterns ran and `rows` records were appended to `output`.
    Written { output: PathBuf, rows: usize },
}

/// A task that failed during batch-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: TaskId,
    pub name: String,
    pub message: String,
}

/// Result of processing every task in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: Vec<(TaskId, ProcessOutcome)>,
    pub failures: Vec<TaskFailure>,
}

impl BatchSummary {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// The batch passes only when no task failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Notifications emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    StateChanged { task: TaskId, state: TaskState },
    BatchFinished(BatchSummary),
}

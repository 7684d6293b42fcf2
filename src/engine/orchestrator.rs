// src/engine/orchestrator.rs

//! Task orchestration.
//!
//! Per task the state machine is:
//!
//! ```text
//! Unconfigured --prompt ok--> Ready --process--> Running --> Succeeded
//!      |                        |                   |
//!      +--prompt cancelled      +--zero patterns    +--error--> Failed
//!         (stays put)              (no-op)
//! ```
//!
//! Patterns are processed strictly one after another. A timeout degrades to
//! a partial row; any other process-level error aborts the rest of the task.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::engine::prompt::OutputPrompt;
use crate::engine::{BatchSummary, ProcessOutcome, TaskEvent, TaskFailure};
use crate::errors::{BatchError, Result};
use crate::exec::{ScratchScript, ToolRequest, ToolRunner, DEFAULT_TIMEOUT};
use crate::fs::FileSystem;
use crate::registry::{Task, TaskRegistry};
use crate::report::{extract, write_batch, ResultRow};
use crate::templates::patch_template;
use crate::types::{EngineRole, TaskId, TaskState};

/// Knobs for a processing session.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Wall-clock limit per pattern.
    pub timeout: Duration,
    /// Where scratch scripts and tool output are written.
    pub scratch_dir: PathBuf,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scratch_dir: PathBuf::from("."),
        }
    }
}

pub struct Orchestrator {
    config: Config,
    registry: TaskRegistry,
    fs: Arc<dyn FileSystem>,
    runner: Box<dyn ToolRunner>,
    options: OrchestratorOptions,
    events: Option<mpsc::UnboundedSender<TaskEvent>>,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        fs: Arc<dyn FileSystem>,
        runner: Box<dyn ToolRunner>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            config,
            registry: TaskRegistry::new(),
            fs,
            runner,
            options,
            events: None,
        }
    }

    /// Subscribe to state-change notifications.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<TaskEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TaskRegistry {
        &mut self.registry
    }

    pub fn state_of(&self, id: TaskId) -> Result<TaskState> {
        Ok(self.registry.get(id)?.state())
    }

    /// Process one task.
    ///
    /// A task without an output file triggers `prompt` once. If the prompt is
    /// cancelled the task stays `Unconfigured` and `OutputUnset` is returned.
    /// Any other error marks the task `Failed`, is logged, and is returned.
    pub async fn process(
        &mut self,
        id: TaskId,
        prompt: &mut dyn OutputPrompt,
    ) -> Result<ProcessOutcome> {
        let task = self.registry.get(id)?;

        if task.output().is_none() {
            info!(task = %id, name = %task.name, "task has no output file; prompting");
            match prompt.choose_output(task) {
                Some(output) => {
                    info!(task = %id, output = %output.display(), "output file chosen");
                    self.registry.get_mut(id)?.set_output(output);
                    self.emit_state(id, TaskState::Ready);
                }
                None => {
                    warn!(task = %id, "output prompt cancelled; task left unconfigured");
                    return Err(BatchError::OutputUnset(id));
                }
            }
        }

        match self.run_task(id).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(task = %id, error = %err, "task processing failed");
                self.set_state(id, TaskState::Failed);
                Err(err)
            }
        }
    }

    /// Process every task independently.
    ///
    /// Failures are logged and counted; they never stop later tasks.
    pub async fn process_all(&mut self, prompt: &mut dyn OutputPrompt) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for id in self.registry.ids() {
            match self.process(id, prompt).await {
                Ok(outcome) => summary.completed.push((id, outcome)),
                Err(err) => {
                    let name = self
                        .registry
                        .get(id)
                        .map(|t| t.name.clone())
                        .unwrap_or_default();
                    info!(task = %id, name = %name, error = %err, "task failed during batch");
                    summary.failures.push(TaskFailure {
                        task: id,
                        name,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            completed = summary.completed.len(),
            failed = summary.failure_count(),
            "batch finished"
        );
        self.emit(TaskEvent::BatchFinished(summary.clone()));
        summary
    }

    async fn run_task(&mut self, id: TaskId) -> Result<ProcessOutcome> {
        let task: Task = self.registry.get(id)?.clone();

        if task.patterns().is_empty() {
            info!(task = %id, name = %task.name, "processing nothing: task has no patterns");
            return Ok(ProcessOutcome::NothingToDo);
        }

        let output = task
            .output()
            .map(Path::to_path_buf)
            .ok_or(BatchError::OutputUnset(id))?;

        info!(
            task = %id,
            program = %task.program.display(),
            template = %task.template.display(),
            patterns = task.patterns().len(),
            "processing task"
        );

        let role = self.config.dispatch(&task.program)?;
        if role == EngineRole::Topas {
            return Err(BatchError::UnsupportedEngine {
                program: task.program.clone(),
            });
        }
        let program = self.config.tool_for(role).to_path_buf();

        self.set_state(id, TaskState::Running);

        let mut rows = Vec::with_capacity(task.patterns().len());
        for pattern in task.patterns() {
            let row = self
                .process_pattern(&program, &task.template, pattern)
                .await
                .inspect_err(|err| {
                    error!(
                        task = %id,
                        program = %program.display(),
                        template = %task.template.display(),
                        pattern = %pattern.display(),
                        error = %err,
                        "pattern failed; aborting remaining patterns"
                    )
                })?;
            rows.push(row);
        }

        write_batch(self.fs.as_ref(), &output, &rows)?;
        self.set_state(id, TaskState::Succeeded);

        Ok(ProcessOutcome::Written {
            output,
            rows: rows.len(),
        })
    }

    async fn process_pattern(
        &mut self,
        program: &Path,
        template: &Path,
        pattern: &Path,
    ) -> Result<ResultRow> {
        let pattern = std::path::absolute(pattern)?;
        info!(template = %template.display(), pattern = %pattern.display(), "processing pattern");

        for input in [template, pattern.as_path()] {
            if !self.fs.is_file(input) {
                return Err(BatchError::MissingInput(input.to_path_buf()));
            }
        }

        let text = self.fs.read_to_string(template)?;
        let patched = patch_template(template, &text, &pattern)?;
        let scratch = ScratchScript::create(Arc::clone(&self.fs), &self.options.scratch_dir, &patched)?;

        let request = ToolRequest {
            program: program.to_path_buf(),
            script: scratch.script().to_path_buf(),
            timeout: self.options.timeout,
        };
        let run = self.runner.run(request).await?;

        if run.timed_out {
            warn!(
                pattern = %pattern.display(),
                "refinement timed out; extracting whatever output exists"
            );
        } else if !run.succeeded() {
            warn!(
                pattern = %pattern.display(),
                exit_code = ?run.exit_code,
                stderr = %run.stderr_string(),
                "refinement exited with failure status"
            );
        }

        Ok(self.extract_row(&scratch, &pattern))
    }

    fn extract_row(&self, scratch: &ScratchScript, pattern: &Path) -> ResultRow {
        match self.fs.read_to_string(scratch.output()) {
            Ok(text) => extract(&text, pattern),
            Err(e) => {
                let err = BatchError::Extraction(format!(
                    "reading {}: {e:#}",
                    scratch.output().display()
                ));
                warn!(pattern = %pattern.display(), error = %err, "keeping id-only row");
                ResultRow::for_pattern(pattern)
            }
        }
    }

    fn set_state(&mut self, id: TaskId, state: TaskState) {
        match self.registry.get_mut(id) {
            Ok(task) => {
                task.set_state(state);
                debug!(task = %id, %state, "task state changed");
                self.emit_state(id, state);
            }
            Err(_) => debug!(task = %id, "state change for removed task ignored"),
        }
    }

    fn emit_state(&self, task: TaskId, state: TaskState) {
        self.emit(TaskEvent::StateChanged { task, state });
    }

    fn emit(&self, event: TaskEvent) {
        if let Some(tx) = &self.events {
            // A closed channel just means nobody is listening any more.
            let _ = tx.send(event);
        }
    }
}

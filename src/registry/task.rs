// src/registry/task.rs

//! The task record: one unit of batch work.

use std::path::{Path, PathBuf};

use crate::types::{TaskId, TaskState};

/// One template + a set of patterns + where the results go.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    /// Human label (plan task name or a generated one).
    pub name: String,
    /// Refinement executable this task targets.
    pub program: PathBuf,
    /// Template script; read-only input.
    pub template: PathBuf,
    patterns: Vec<PathBuf>,
    output: Option<PathBuf>,
    state: TaskState,
}

impl Task {
    pub(crate) fn new(id: TaskId, name: String, program: PathBuf, template: PathBuf) -> Self {
        Self {
            id,
            name,
            program,
            template,
            patterns: Vec::new(),
            output: None,
            state: TaskState::Unconfigured,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn patterns(&self) -> &[PathBuf] {
        &self.patterns
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Add patterns, ignoring any already present. Returns how many were new.
    pub fn add_patterns<I, P>(&mut self, patterns: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for pattern in patterns {
            let pattern = pattern.into();
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
                added += 1;
            }
        }
        added
    }

    pub fn set_template(&mut self, template: impl Into<PathBuf>) {
        self.template = template.into();
    }

    pub fn set_program(&mut self, program: impl Into<PathBuf>) {
        self.program = program.into();
    }

    /// Choosing an output moves an unconfigured task to `Ready`.
    pub fn set_output(&mut self, output: impl Into<PathBuf>) {
        self.output = Some(output.into());
        if self.state == TaskState::Unconfigured {
            self.state = TaskState::Ready;
        }
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }
}

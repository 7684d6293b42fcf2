// src/engine/prompt.rs

//! Asking the operator for a report file when a task has none.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::registry::Task;

/// Supplies an output path for a task that has none.
///
/// Returning `None` means the operator cancelled; the task stays
/// unconfigured.
pub trait OutputPrompt {
    fn choose_output(&mut self, task: &Task) -> Option<PathBuf>;
}

/// Never supplies a path. Used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutputPrompt;

impl OutputPrompt for NoOutputPrompt {
    fn choose_output(&mut self, _task: &Task) -> Option<PathBuf> {
        None
    }
}

/// Interactive prompt on stdin/stderr.
///
/// An empty answer selects `fallback`; end of input cancels.
#[derive(Debug, Clone)]
pub struct StdinOutputPrompt {
    fallback: PathBuf,
}

impl StdinOutputPrompt {
    pub fn new(fallback: impl Into<PathBuf>) -> Self {
        Self {
            fallback: fallback.into(),
        }
    }

    fn ask(&self, task: &Task, input: &mut impl BufRead, out: &mut impl Write) -> Option<PathBuf> {
        let _ = writeln!(out, "You must choose an output file for patterns:");
        for pattern in task.patterns() {
            let _ = writeln!(out, "  {}", pattern.display());
        }
        let _ = write!(out, "Output file [{}]: ", self.fallback.display());
        let _ = out.flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                debug!(task = %task.id(), "output prompt cancelled");
                None
            }
            Ok(_) => {
                let answer = line.trim();
                if answer.is_empty() {
                    Some(self.fallback.clone())
                } else {
                    Some(PathBuf::from(answer))
                }
            }
        }
    }
}

impl OutputPrompt for StdinOutputPrompt {
    fn choose_output(&mut self, task: &Task) -> Option<PathBuf> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        self.ask(task, &mut input, &mut io::stderr())
    }
}

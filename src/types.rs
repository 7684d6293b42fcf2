use std::fmt;

/// Opaque identifier for a task in the registry.
///
/// Ids are handed out by [`crate::registry::TaskRegistry`] and are never
/// reused within the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a task.
///
/// - `Unconfigured`: no output file chosen yet.
/// - `Ready`: an output file is set; patterns may still be empty.
/// - `Running`: patterns are being processed.
/// - `Succeeded` / `Failed`: result of the last run. Both may run again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Unconfigured,
    Ready,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Unconfigured => "unconfigured",
            TaskState::Ready => "ready",
            TaskState::Running => "running",
            TaskState::Succeeded => "succeeded",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Which of the two known refinement executables a task targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRole {
    /// TOPAS command-line kernel (`tc.exe`).
    Tc,
    /// TOPAS GUI executable (`Topas.exe`).
    Topas,
}

impl fmt::Display for EngineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineRole::Tc => f.write_str("tc"),
            EngineRole::Topas => f.write_str("topas"),
        }
    }
}

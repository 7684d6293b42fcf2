// src/registry/mod.rs

//! In-memory task registry.
//!
//! The registry maps opaque [`TaskId`]s to [`Task`] records. Callers outside
//! the orchestrator only hold ids; the records themselves live here.

mod task;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::{BatchError, Result};
use crate::types::TaskId;

pub use task::Task;

#[derive(Debug, Default)]
pub struct TaskRegistry {
    next_id: u64,
    tasks: BTreeMap<TaskId, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new task and return its id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        program: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
    ) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        let task = Task::new(id, name.into(), program.into(), template.into());
        debug!(task = %id, name = %task.name, "task created");
        self.tasks.insert(id, task);
        id
    }

    pub fn get(&self, id: TaskId) -> Result<&Task> {
        self.tasks.get(&id).ok_or(BatchError::TaskNotFound(id))
    }

    pub fn get_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks.get_mut(&id).ok_or(BatchError::TaskNotFound(id))
    }

    /// Discard a task.
    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let task = self.tasks.remove(&id).ok_or(BatchError::TaskNotFound(id))?;
        debug!(task = %id, name = %task.name, "task removed");
        Ok(task)
    }

    /// Ids in creation order.
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_not_reused() {
        let mut reg = TaskRegistry::new();
        let a = reg.create("a", "/tc", "/a.inp");
        let b = reg.create("b", "/tc", "/b.inp");
        assert_ne!(a, b);

        reg.remove(b).unwrap();
        let c = reg.create("c", "/tc", "/c.inp");
        assert_ne!(b, c);
        assert_eq!(reg.ids(), vec![a, c]);
    }

    #[test]
    fn missing_task_is_reported() {
        let mut reg = TaskRegistry::new();
        let a = reg.create("a", "/tc", "/a.inp");
        reg.remove(a).unwrap();

        assert!(matches!(reg.get(a), Err(BatchError::TaskNotFound(id)) if id == a));
        assert!(matches!(reg.remove(a), Err(BatchError::TaskNotFound(_))));
    }
}

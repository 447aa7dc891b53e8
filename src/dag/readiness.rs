// src/dag/readiness.rs

//! Dependency gating against the current progress document.

use tracing::trace;

use crate::dag::task_state::TaskState;
use crate::errors::BlockingDependency;
use crate::plan::definition::TaskTable;
use crate::plan::progress::{ProgressDocument, TaskStatus};

/// Read-only answers to "can this task be started?".
#[derive(Debug, Clone, Copy)]
pub struct Readiness<'a> {
    tasks: &'a TaskTable,
    progress: &'a ProgressDocument,
}

impl<'a> Readiness<'a> {
    pub fn new(tasks: &'a TaskTable, progress: &'a ProgressDocument) -> Self {
        Self { tasks, progress }
    }

    /// `true` when every dependency of `key` has a completed progress record.
    ///
    /// A task without dependencies is always satisfied. Unknown dependency
    /// keys can never be completed, so they keep the task blocked. An unknown
    /// `key` has nothing to wait for and is reported as satisfied; callers
    /// that care check the definition first.
    pub fn is_satisfied(&self, key: &str) -> bool {
        let Some(task) = self.tasks.get(key) else {
            return true;
        };
        task.deps.iter().all(|dep| self.progress.is_completed(dep))
    }

    /// Dependencies of `key` that are not completed yet, in declaration order,
    /// with their names when defined.
    pub fn unmet_dependencies(&self, key: &str) -> Vec<BlockingDependency> {
        let Some(task) = self.tasks.get(key) else {
            return Vec::new();
        };
        task.deps
            .iter()
            .filter(|dep| !self.progress.is_completed(dep))
            .map(|dep| BlockingDependency {
                key: dep.clone(),
                name: self.tasks.get(dep).map(|d| d.name.clone()),
            })
            .collect()
    }

    /// Tasks that are not completed and whose dependencies are satisfied, in
    /// plan order.
    pub fn available_tasks(&self) -> Vec<&'a str> {
        let available: Vec<&'a str> = self
            .tasks
            .keys()
            .filter(|key| !self.progress.is_completed(key))
            .filter(|key| self.is_satisfied(key))
            .collect();
        trace!(count = available.len(), "computed available tasks");
        available
    }

    /// The first `count` available tasks.
    pub fn next_recommended(&self, count: usize) -> Vec<&'a str> {
        let mut available = self.available_tasks();
        available.truncate(count);
        available
    }

    /// Display state of a single task.
    pub fn state_of(&self, key: &str) -> TaskState {
        match self.progress.status_of(key) {
            TaskStatus::Completed => TaskState::Completed,
            TaskStatus::InProgress => TaskState::InProgress,
            TaskStatus::NotStarted if self.is_satisfied(key) => TaskState::Available,
            TaskStatus::NotStarted => TaskState::Locked,
        }
    }
}

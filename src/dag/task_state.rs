// src/dag/task_state.rs

//! Combined progress + gating state of a task, as shown in listings.

use std::fmt;

/// Where a task stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Completed,
    /// Started and not yet completed (whether or not its deps are still met).
    InProgress,
    /// Not started, all dependencies completed.
    Available,
    /// Not started, waiting on at least one dependency.
    Locked,
}

impl TaskState {
    pub fn can_start(self) -> bool {
        matches!(self, TaskState::Available | TaskState::InProgress)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Completed => write!(f, "completed"),
            TaskState::InProgress => write!(f, "in progress"),
            TaskState::Available => write!(f, "available"),
            TaskState::Locked => write!(f, "locked"),
        }
    }
}

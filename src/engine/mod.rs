// src/engine/mod.rs

//! Plan engine.
//!
//! The pure transitions live in [`lifecycle`] (start/complete) and
//! [`repair`] (orphan cleanup); they operate on in-memory documents and never
//! touch the filesystem. [`runtime`] is the IO shell: it loads the
//! documents, runs a transition and persists the result only when the
//! transition succeeded.

use crate::types::TaskKey;

/// What a successful `start` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub task: TaskKey,
    /// The task that was current before, if it was a different one.
    pub paused: Option<TaskKey>,
    /// The task was already in progress and its start time was reset.
    pub restarted: bool,
}

/// What a successful `complete` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteOutcome {
    pub task: TaskKey,
    pub duration_minutes: i64,
    pub total_study_time: i64,
    /// Completed records after this completion.
    pub completed_count: usize,
    /// First completion, or every fifth one.
    pub milestone: bool,
}

pub mod lifecycle;
pub mod repair;
pub mod runtime;

pub use repair::{Repair, RepairReport};
pub use runtime::{PlanSnapshot, ProgressLoad, Workspace};

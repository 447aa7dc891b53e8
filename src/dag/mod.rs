// src/dag/mod.rs

//! Dependency graph engine.
//!
//! - [`graph`] answers structural questions about the dependency relation:
//!   missing references, cycles, depth, plan-design orphans.
//! - [`readiness`] combines definitions with progress to decide which tasks
//!   may be started.
//! - [`task_state`] is the per-task view used by listings.

pub mod graph;
pub mod readiness;
pub mod task_state;

pub use graph::{DependencyCycle, DependencyGraph, MissingDependency};
pub use readiness::Readiness;
pub use task_state::TaskState;

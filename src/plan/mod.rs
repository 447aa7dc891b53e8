// src/plan/mod.rs

//! Plan data model and persistence.
//!
//! - [`definition`]: static task metadata (the definitions document).
//! - [`progress`]: per-task status records and aggregate counters.
//! - [`store`]: plan directory layout and JSON load/save.

pub mod definition;
pub mod progress;
pub mod store;

pub use definition::{parse_duration_hours, PlanDefinition, TaskDefinition, TaskTable};
pub use progress::{DailyLogEntry, ProgressDocument, RecordExtra, TaskProgress, TaskStatus};
pub use store::{load_definitions, JsonProgressStore, PlanPaths, ProgressStore};

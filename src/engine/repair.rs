// src/engine/repair.rs

//! Best-effort reconciliation of the plan directory.
//!
//! Only progress-side problems are repaired. Missing or circular
//! dependencies live in the definitions document, which is never written
//! here.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::plan::definition::TaskTable;
use crate::plan::progress::ProgressDocument;
use crate::types::TaskKey;

/// One repair the pass found necessary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    CreateDataDir(PathBuf),
    CreateProgressDocument(PathBuf),
    RemoveOrphans(Vec<TaskKey>),
}

impl Repair {
    pub fn issue(&self) -> String {
        match self {
            Repair::CreateDataDir(_) => "Missing data directory".to_string(),
            Repair::CreateProgressDocument(_) => "Missing progress.json".to_string(),
            Repair::RemoveOrphans(keys) => format!("{} orphaned progress entries", keys.len()),
        }
    }

    pub fn action(&self) -> String {
        match self {
            Repair::CreateDataDir(dir) => format!("mkdir -p {}", dir.display()),
            Repair::CreateProgressDocument(_) => "Create initial progress file".to_string(),
            Repair::RemoveOrphans(keys) => format!("Remove entries for: {}", keys.join(", ")),
        }
    }
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.issue(), self.action())
    }
}

/// Result of a repair pass.
#[derive(Debug, Clone, Default)]
pub struct RepairReport {
    pub dry_run: bool,
    /// Repairs found, in the order they were (or would be) applied.
    pub repairs: Vec<Repair>,
    /// Problems the pass noticed but will not touch.
    pub unrepairable: Vec<String>,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.repairs.is_empty() && self.unrepairable.is_empty()
    }
}

/// Drop progress entries whose key has no definition. Returns the removed
/// keys; running it again on the result removes nothing.
pub fn remove_orphans(doc: &mut ProgressDocument, tasks: &TaskTable) -> Vec<TaskKey> {
    let orphans = doc.orphaned_keys(tasks);
    for key in &orphans {
        doc.tasks.remove(key);
        warn!(task = %key, "removed orphaned progress entry");
    }
    if doc
        .current_task
        .as_deref()
        .is_some_and(|current| !tasks.contains(current))
    {
        info!("cleared current task pointing at a removed definition");
        doc.current_task = None;
    }
    orphans
}

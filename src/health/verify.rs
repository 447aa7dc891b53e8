// src/health/verify.rs

use tracing::warn;

use crate::dag::DependencyGraph;
use crate::engine::Workspace;
use crate::errors::Result;
use crate::health::checks::{self, CheckResult};
use crate::plan::definition::{TaskDefinition, TaskTable};
use crate::plan::progress::TaskStatus;
use crate::types::TaskKey;

/// Target keyword that selects the dependency checks.
pub const DEPS_TARGET: &str = "deps";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    NotFound,
    Completed,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyReport {
    pub key: TaskKey,
    /// `None` when the key has no definition.
    pub name: Option<String>,
    pub status: DependencyStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskVerification {
    pub key: TaskKey,
    pub definition: TaskDefinition,
    pub dependencies: Vec<DependencyReport>,
    /// Tasks that list this one as a direct dependency.
    pub unlocks: Vec<TaskKey>,
}

/// Output of `verify`, by target.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    /// `verify deps`
    Dependencies(Vec<CheckResult>),
    /// `verify <id>` for a defined task.
    Task(TaskVerification),
    /// `verify` without a target, or with one that names nothing.
    General {
        unknown_target: Option<String>,
        checks: Vec<CheckResult>,
    },
}

/// `tasks` is `None` when the definitions document does not parse; only the
/// general checks can run then.
pub fn verify(
    ws: &Workspace,
    tasks: Option<&TaskTable>,
    target: Option<&str>,
) -> Result<Verification> {
    if let Some(tasks) = tasks {
        match target {
            Some(DEPS_TARGET) => {
                return Ok(Verification::Dependencies(checks::dependencies(tasks)));
            }
            Some(key) => {
                if let Some(definition) = tasks.get(key) {
                    return verify_task(ws, tasks, key, definition);
                }
            }
            None => {}
        }
    }

    if let Some(target) = target {
        warn!(target = %target, "verify target is neither `deps` nor a task");
    }
    let mut results = checks::file_structure(ws);
    results.extend(checks::config_format(ws));
    Ok(Verification::General {
        unknown_target: target.map(str::to_string),
        checks: results,
    })
}

fn verify_task(
    ws: &Workspace,
    tasks: &TaskTable,
    key: &str,
    definition: &TaskDefinition,
) -> Result<Verification> {
    let progress = ws.load_progress_lenient()?;

    let dependencies = definition
        .deps
        .iter()
        .map(|dep| {
            let name = tasks.get(dep).map(|d| d.name.clone());
            let status = match (&name, progress.status_of(dep)) {
                (None, _) => DependencyStatus::NotFound,
                (Some(_), TaskStatus::Completed) => DependencyStatus::Completed,
                (Some(_), TaskStatus::InProgress) => DependencyStatus::InProgress,
                (Some(_), TaskStatus::NotStarted) => DependencyStatus::Pending,
            };
            DependencyReport {
                key: dep.clone(),
                name,
                status,
            }
        })
        .collect();

    Ok(Verification::Task(TaskVerification {
        key: key.to_string(),
        definition: definition.clone(),
        dependencies,
        unlocks: DependencyGraph::new(tasks)
            .dependents_of(key)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }))
}

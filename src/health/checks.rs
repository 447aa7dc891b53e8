// src/health/checks.rs

//! The four check groups behind `check` and `verify`.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::dag::DependencyGraph;
use crate::engine::Workspace;
use crate::plan::definition::{PlanDefinition, TaskTable};
use crate::plan::progress::ProgressDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Pass => write!(f, "pass"),
            CheckStatus::Warning => write!(f, "warning"),
            CheckStatus::Fail => write!(f, "fail"),
        }
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn new(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warning, message)
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, message)
    }

    pub fn is_pass(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Pass / warning / fail counts over a set of checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckTally {
    pub pass: usize,
    pub warning: usize,
    pub fail: usize,
}

impl CheckTally {
    pub fn of(checks: &[CheckResult]) -> Self {
        checks.iter().fold(Self::default(), |mut tally, check| {
            match check.status {
                CheckStatus::Pass => tally.pass += 1,
                CheckStatus::Warning => tally.warning += 1,
                CheckStatus::Fail => tally.fail += 1,
            }
            tally
        })
    }

    pub fn verdict(&self) -> Verdict {
        if self.fail > 0 {
            Verdict::Critical
        } else if self.warning > 0 {
            Verdict::Functional
        } else {
            Verdict::Ready
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every check passed.
    Ready,
    /// Warnings only.
    Functional,
    /// At least one failure.
    Critical,
}

/// Full `check` run.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    pub fn tally(&self) -> CheckTally {
        CheckTally::of(&self.checks)
    }
}

/// Run every check group. `tasks` is `None` when the definitions document
/// does not parse; the groups that need definitions are skipped then (the
/// config format group reports the parse failure).
pub fn health_check(ws: &Workspace, tasks: Option<&TaskTable>) -> HealthReport {
    let mut checks = file_structure(ws);
    checks.extend(config_format(ws));
    if let Some(tasks) = tasks {
        checks.extend(dependencies(tasks));
    }
    checks.extend(progress_integrity(ws, tasks));
    debug!(checks = checks.len(), "health check finished");
    HealthReport { checks }
}

/// Presence of the documents and directories of a plan.
pub fn file_structure(ws: &Workspace) -> Vec<CheckResult> {
    let fs = ws.fs();
    let paths = ws.paths();
    let mut checks = Vec::with_capacity(4);

    checks.push(if fs.is_file(&paths.definitions()) {
        CheckResult::pass("File: config.json", "Exists")
    } else {
        CheckResult::fail("File: config.json", "Missing critical file")
    });
    checks.push(if fs.is_file(&paths.progress()) {
        CheckResult::pass("File: progress.json", "Exists")
    } else {
        CheckResult::warning("File: progress.json", "Will be created on first run")
    });
    checks.push(if fs.is_dir(&paths.data_dir()) {
        CheckResult::pass("Directory: data/", "Exists")
    } else {
        CheckResult::warning("Directory: data/", "Will be created on first run")
    });
    checks.push(if fs.is_dir(&paths.scripts_dir()) {
        CheckResult::pass("Directory: scripts/", "Exists")
    } else {
        CheckResult::warning("Directory: scripts/", "Optional - create for organization")
    });

    checks
}

/// Shape of the definitions document: valid JSON, plan fields, and a
/// well-formed task table.
pub fn config_format(ws: &Workspace) -> Vec<CheckResult> {
    const VALIDITY: &str = "Config: JSON validity";

    let path = ws.paths().definitions();
    let text = match ws.fs().read_to_string(&path) {
        Ok(text) => text,
        Err(err) => return vec![CheckResult::fail(VALIDITY, format!("Cannot read: {err}"))],
    };
    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => return vec![CheckResult::fail(VALIDITY, format!("Invalid JSON: {err}"))],
    };
    let plan: PlanDefinition = match serde_json::from_value(value) {
        Ok(plan) => plan,
        Err(err) => {
            return vec![CheckResult::fail(
                "Config: schema",
                format!("Unexpected field types: {err}"),
            )];
        }
    };

    let mut checks = Vec::with_capacity(4);
    checks.push(match plan.display_name() {
        Some(name) => CheckResult::pass("Config: name field", format!("Found: \"{name}\"")),
        None => CheckResult::warning("Config: name field", "Missing - add a name for your plan"),
    });
    checks.push(match plan.display_duration() {
        Some(duration) => CheckResult::pass("Config: duration field", format!("Found: {duration}")),
        None => CheckResult::warning("Config: duration field", "Missing - add estimated duration"),
    });
    checks.push(if plan.tasks.is_empty() {
        CheckResult::fail("Config: tasks field", "No tasks defined - add learning tasks")
    } else {
        CheckResult::pass(
            "Config: tasks field",
            format!("Found: {} tasks", plan.tasks.len()),
        )
    });

    let malformed: Vec<&str> = plan
        .tasks
        .iter()
        .filter(|(_, task)| !task.is_well_formed())
        .map(|(key, _)| key)
        .collect();
    checks.push(if malformed.is_empty() {
        CheckResult::pass(
            "Tasks: format validation",
            format!("All {} tasks properly formatted", plan.tasks.len()),
        )
    } else {
        CheckResult::fail(
            "Tasks: format validation",
            format!("Invalid format in tasks: {}", malformed.join(", ")),
        )
    });

    checks
}

/// Missing references, cycles and plan-design orphans.
pub fn dependencies(tasks: &TaskTable) -> Vec<CheckResult> {
    let graph = DependencyGraph::new(tasks);
    let mut checks = Vec::with_capacity(3);

    let missing = graph.find_missing_dependencies();
    checks.push(if missing.is_empty() {
        CheckResult::pass(
            "Dependencies: existence",
            "All dependencies reference existing tasks",
        )
    } else {
        CheckResult::fail(
            "Dependencies: existence",
            format!("{} missing: {}", missing.len(), join(&missing, ", ")),
        )
    });

    let cycles = graph.detect_cycles();
    checks.push(if cycles.is_empty() {
        CheckResult::pass("Dependencies: circular check", "No circular dependencies found")
    } else {
        CheckResult::fail(
            "Dependencies: circular check",
            format!("Circular: {}", join(&cycles, "; ")),
        )
    });

    let orphans = graph.detect_orphans();
    checks.push(if orphans.is_empty() {
        CheckResult::pass("Dependencies: orphaned tasks", "All tasks properly connected")
    } else {
        CheckResult::warning(
            "Dependencies: orphaned tasks",
            format!("Stage>1 without deps: {}", orphans.join(", ")),
        )
    });

    checks
}

/// The progress document: presence, JSON validity, orphaned entries and
/// required fields.
pub fn progress_integrity(ws: &Workspace, tasks: Option<&TaskTable>) -> Vec<CheckResult> {
    let path = ws.paths().progress();
    if !ws.fs().is_file(&path) {
        return vec![CheckResult::warning(
            "Progress: data file",
            "No progress data yet - will be created on first use",
        )];
    }

    let parsed = ws
        .fs()
        .read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|err| err.to_string()));
    let value = match parsed {
        Ok(value) => value,
        Err(err) => {
            return vec![CheckResult::fail(
                "Progress: JSON validity",
                format!("Corrupted: {err}"),
            )];
        }
    };

    let mut checks = Vec::with_capacity(2);

    if let Some(tasks) = tasks {
        let orphans: Vec<&str> = value
            .get("tasks")
            .and_then(Value::as_object)
            .map(|records| {
                records
                    .keys()
                    .map(String::as_str)
                    .filter(|key| !tasks.contains(key))
                    .collect()
            })
            .unwrap_or_default();
        checks.push(if orphans.is_empty() {
            CheckResult::pass("Progress: orphaned entries", "All progress entries valid")
        } else {
            CheckResult::warning(
                "Progress: orphaned entries",
                format!("{} orphaned: {}", orphans.len(), orphans.join(", ")),
            )
        });
    }

    let has_required = value.get("startDate").is_some_and(Value::is_string)
        && value.get("totalStudyTime").is_some_and(Value::is_number);
    checks.push(if !has_required {
        CheckResult::fail("Progress: data structure", "Missing required fields")
    } else {
        match serde_json::from_value::<ProgressDocument>(value) {
            Ok(_) => CheckResult::pass("Progress: data structure", "Valid structure"),
            Err(err) => CheckResult::fail(
                "Progress: data structure",
                format!("Invalid records: {err}"),
            ),
        }
    });

    checks
}

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

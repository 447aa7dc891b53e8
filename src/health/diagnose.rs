// src/health/diagnose.rs

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::config::Settings;
use crate::dag::DependencyGraph;
use crate::engine::{ProgressLoad, Workspace};
use crate::errors::Result;
use crate::plan::definition::TaskTable;
use crate::plan::progress::{ProgressDocument, TaskProgress};
use crate::types::TaskKey;

/// Aggregates over the progress document.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub total_study_minutes: i64,
    pub study_days: usize,
    pub completed: usize,
    pub in_progress: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Tasks in progress for longer than `stuck_after_days`.
    StuckTasks { days: u32, tasks: Vec<TaskKey> },
    /// Depth analysis was skipped because the graph has cycles.
    CyclicGraph,
    /// The progress document exists but does not parse.
    UnreadableProgress(String),
    /// Average estimated task length is above `long_task_hours`.
    LongTasks { average_hours: f64 },
    /// Longest dependency chain is deeper than `deep_chain_depth`.
    DeepChains { depth: usize },
}

impl Finding {
    /// Findings that point at a broken plan rather than a suggestion.
    pub fn is_error(&self) -> bool {
        matches!(self, Finding::CyclicGraph | Finding::UnreadableProgress(_))
    }
}

/// Output of `diagnose`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    /// `(stage, task count)`, stages ascending.
    pub distribution: Vec<(u32, usize)>,
    /// `None` when the dependency graph has a cycle.
    pub max_depth: Option<usize>,
    /// `None` when no progress document has been written yet.
    pub progress: Option<ProgressSummary>,
    pub total_estimated_hours: f64,
    pub average_estimated_hours: f64,
    pub findings: Vec<Finding>,
}

/// Deep analysis of the plan and the progress made on it.
pub fn diagnose(ws: &Workspace, tasks: &TaskTable) -> Result<Diagnosis> {
    let settings = ws.settings();
    let mut findings = Vec::new();

    let distribution = tasks
        .stages()
        .into_iter()
        .map(|stage| {
            let count = tasks.iter().filter(|(_, t)| t.stage == stage).count();
            (stage, count)
        })
        .collect();

    let graph = DependencyGraph::new(tasks);
    let max_depth = if graph.is_acyclic() {
        Some(graph.max_depth())
    } else {
        findings.push(Finding::CyclicGraph);
        None
    };

    let progress = match ws.load_progress_checked()? {
        ProgressLoad::Missing => None,
        ProgressLoad::Malformed(message) => {
            findings.push(Finding::UnreadableProgress(message));
            None
        }
        ProgressLoad::Loaded(doc) => {
            let stuck = stuck_tasks(&doc, ws.now(), settings.stuck_after_days());
            if !stuck.is_empty() {
                findings.push(Finding::StuckTasks {
                    days: settings.stuck_after_days(),
                    tasks: stuck,
                });
            }
            Some(ProgressSummary {
                total_study_minutes: doc.total_study_time,
                study_days: doc.daily_log.len(),
                completed: doc.completed_count(),
                in_progress: doc.in_progress_count(),
            })
        }
    };

    let total_estimated_hours: f64 = tasks.iter().map(|(_, t)| t.estimated_hours()).sum();
    let average_estimated_hours = if tasks.is_empty() {
        0.0
    } else {
        total_estimated_hours / tasks.len() as f64
    };

    findings.extend(recommendations(settings, average_estimated_hours, max_depth));

    debug!(findings = findings.len(), "diagnostics finished");

    Ok(Diagnosis {
        distribution,
        max_depth,
        progress,
        total_estimated_hours,
        average_estimated_hours,
        findings,
    })
}

fn recommendations(
    settings: &Settings,
    average_hours: f64,
    max_depth: Option<usize>,
) -> Vec<Finding> {
    let mut out = Vec::new();
    if average_hours > settings.long_task_hours() {
        out.push(Finding::LongTasks { average_hours });
    }
    if let Some(depth) = max_depth.filter(|d| *d > settings.deep_chain_depth()) {
        out.push(Finding::DeepChains { depth });
    }
    out
}

/// In-progress tasks started more than `days` days before `now`, in key
/// order.
pub fn stuck_tasks(
    doc: &ProgressDocument,
    now: DateTime<FixedOffset>,
    days: u32,
) -> Vec<TaskKey> {
    let limit_ms = i64::from(days) * 24 * 60 * 60 * 1000;
    doc.tasks
        .iter()
        .filter_map(|(key, record)| match record {
            TaskProgress::InProgress { started_at, .. } => {
                let age_ms = (now.to_utc() - *started_at).num_milliseconds();
                (age_ms > limit_ms).then(|| key.clone())
            }
            TaskProgress::Completed { .. } => None,
        })
        .collect()
}

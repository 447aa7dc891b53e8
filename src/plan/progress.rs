// src/plan/progress.rs

//! Mutable progress state: the progress document (`data/progress.json`).

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::definition::TaskTable;
use crate::types::TaskKey;

/// Aggregate root for everything a learner has done so far.
///
/// Unknown fields, top-level or per record, are kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDocument {
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub tasks: BTreeMap<TaskKey, TaskProgress>,
    #[serde(default)]
    pub daily_log: BTreeMap<NaiveDate, DailyLogEntry>,
    /// Minutes; the sum of `duration_minutes` over completed tasks.
    #[serde(default)]
    pub total_study_time: i64,
    /// Informational only: starting another task is always allowed.
    #[serde(default)]
    pub current_task: Option<TaskKey>,
    #[serde(default)]
    pub last_study_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProgressDocument {
    pub fn new(start_date: DateTime<Utc>) -> Self {
        Self {
            start_date,
            tasks: BTreeMap::new(),
            daily_log: BTreeMap::new(),
            total_study_time: 0,
            current_task: None,
            last_study_date: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn status_of(&self, key: &str) -> TaskStatus {
        self.tasks
            .get(key)
            .map(TaskProgress::status)
            .unwrap_or(TaskStatus::NotStarted)
    }

    pub fn is_completed(&self, key: &str) -> bool {
        self.status_of(key) == TaskStatus::Completed
    }

    /// Completed records, including ones whose definition has been removed.
    pub fn completed_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|p| p.status() == TaskStatus::Completed)
            .count()
    }

    pub fn in_progress_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|p| p.status() == TaskStatus::InProgress)
            .count()
    }

    /// Progress keys with no matching definition, in key order.
    pub fn orphaned_keys(&self, definitions: &TaskTable) -> Vec<TaskKey> {
        self.tasks
            .keys()
            .filter(|key| !definitions.contains(key))
            .cloned()
            .collect()
    }

    /// Today's log entry, created empty if absent.
    pub fn daily_entry_mut(&mut self, day: NaiveDate) -> &mut DailyLogEntry {
        self.daily_log.entry(day).or_default()
    }
}

/// Fields of a record the typed variants do not interpret, kept verbatim.
pub type RecordExtra = serde_json::Map<String, serde_json::Value>;

/// Per-task progress record. Absence of a record means "not started".
///
/// On disk every record is one flat object keyed by `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecordRepr", into = "TaskRecordRepr")]
pub enum TaskProgress {
    InProgress {
        started_at: DateTime<Utc>,
        /// Left over from an earlier completion written by other tools.
        completed_at: Option<DateTime<Utc>>,
        duration_minutes: Option<i64>,
        extra: RecordExtra,
    },
    Completed {
        /// `None` when the task was completed without being started.
        started_at: Option<DateTime<Utc>>,
        completed_at: DateTime<Utc>,
        duration_minutes: i64,
        extra: RecordExtra,
    },
}

impl TaskProgress {
    pub fn in_progress(started_at: DateTime<Utc>) -> Self {
        TaskProgress::InProgress {
            started_at,
            completed_at: None,
            duration_minutes: None,
            extra: RecordExtra::new(),
        }
    }

    pub fn completed(
        started_at: Option<DateTime<Utc>>,
        completed_at: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Self {
        TaskProgress::Completed {
            started_at,
            completed_at,
            duration_minutes,
            extra: RecordExtra::new(),
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            TaskProgress::InProgress { .. } => TaskStatus::InProgress,
            TaskProgress::Completed { .. } => TaskStatus::Completed,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TaskProgress::InProgress { started_at, .. } => Some(*started_at),
            TaskProgress::Completed { started_at, .. } => *started_at,
        }
    }

    /// Only a completed record has a completion time that counts.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TaskProgress::InProgress { .. } => None,
            TaskProgress::Completed { completed_at, .. } => Some(*completed_at),
        }
    }

    pub fn extra(&self) -> &RecordExtra {
        match self {
            TaskProgress::InProgress { extra, .. } | TaskProgress::Completed { extra, .. } => extra,
        }
    }

    pub fn into_extra(self) -> RecordExtra {
        match self {
            TaskProgress::InProgress { extra, .. } | TaskProgress::Completed { extra, .. } => extra,
        }
    }

    /// Replace the uninterpreted fields, e.g. to carry them across a transition.
    pub fn with_extra(mut self, carried: RecordExtra) -> Self {
        match &mut self {
            TaskProgress::InProgress { extra, .. } | TaskProgress::Completed { extra, .. } => {
                *extra = carried;
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RecordStatus {
    InProgress,
    Completed,
}

/// On-disk shape of a task record: every field but `status` is optional.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecordRepr {
    status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_minutes: Option<i64>,
    #[serde(flatten)]
    extra: RecordExtra,
}

impl TryFrom<TaskRecordRepr> for TaskProgress {
    type Error = String;

    fn try_from(raw: TaskRecordRepr) -> Result<Self, Self::Error> {
        match raw.status {
            RecordStatus::InProgress => {
                let started_at = raw
                    .started_at
                    .ok_or_else(|| "in_progress record without startedAt".to_string())?;
                Ok(TaskProgress::InProgress {
                    started_at,
                    completed_at: raw.completed_at,
                    duration_minutes: raw.duration_minutes,
                    extra: raw.extra,
                })
            }
            RecordStatus::Completed => {
                let completed_at = raw
                    .completed_at
                    .ok_or_else(|| "completed record without completedAt".to_string())?;
                Ok(TaskProgress::Completed {
                    started_at: raw.started_at,
                    completed_at,
                    duration_minutes: raw.duration_minutes.unwrap_or(0),
                    extra: raw.extra,
                })
            }
        }
    }
}

impl From<TaskProgress> for TaskRecordRepr {
    fn from(progress: TaskProgress) -> Self {
        match progress {
            TaskProgress::InProgress {
                started_at,
                completed_at,
                duration_minutes,
                extra,
            } => TaskRecordRepr {
                status: RecordStatus::InProgress,
                started_at: Some(started_at),
                completed_at,
                duration_minutes,
                extra,
            },
            TaskProgress::Completed {
                started_at,
                completed_at,
                duration_minutes,
                extra,
            } => TaskRecordRepr {
                status: RecordStatus::Completed,
                started_at,
                completed_at: Some(completed_at),
                duration_minutes: Some(duration_minutes),
                extra,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::NotStarted => write!(f, "not_started"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// What happened on one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLogEntry {
    #[serde(default)]
    pub tasks_started: Vec<TaskKey>,
    #[serde(default)]
    pub tasks_completed: Vec<TaskKey>,
    #[serde(default)]
    pub minutes: i64,
}

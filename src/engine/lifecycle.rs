// src/engine/lifecycle.rs

//! Task lifecycle transitions: absent → in_progress → completed.
//!
//! Both transitions validate everything before touching the document, so an
//! `Err` always leaves it unchanged.

use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::dag::Readiness;
use crate::engine::{CompleteOutcome, StartOutcome};
use crate::errors::{PlanError, Result};
use crate::plan::definition::TaskTable;
use crate::plan::progress::{ProgressDocument, TaskProgress};

/// Mark `key` as in progress.
///
/// Re-starting an in-progress task resets `startedAt`. Fields of the old
/// record that no transition interprets are carried over. Starting while
/// another task is the current one only reports it as paused; that task's
/// record is left alone.
pub fn start(
    doc: &mut ProgressDocument,
    tasks: &TaskTable,
    key: &str,
    now: DateTime<FixedOffset>,
) -> Result<StartOutcome> {
    if !tasks.contains(key) {
        return Err(PlanError::TaskNotFound(key.to_string()));
    }
    if doc.is_completed(key) {
        return Err(PlanError::AlreadyCompleted(key.to_string()));
    }

    let readiness = Readiness::new(tasks, doc);
    if !readiness.is_satisfied(key) {
        let blocking = readiness.unmet_dependencies(key);
        debug!(task = %key, blocking = blocking.len(), "start refused");
        return Err(PlanError::PrerequisitesNotMet {
            task: key.to_string(),
            blocking,
        });
    }

    let paused = doc.current_task.clone().filter(|current| current != key);
    let previous_record = doc.tasks.remove(key);
    let restarted = matches!(previous_record, Some(TaskProgress::InProgress { .. }));
    let carried = previous_record
        .map(TaskProgress::into_extra)
        .unwrap_or_default();

    doc.tasks.insert(
        key.to_string(),
        TaskProgress::in_progress(timestamp(now)).with_extra(carried),
    );
    doc.current_task = Some(key.to_string());
    doc.daily_entry_mut(now.date_naive())
        .tasks_started
        .push(key.to_string());

    if let Some(previous) = &paused {
        warn!(task = %key, previous = %previous, "previous task paused");
    }
    info!(task = %key, restarted, "task started");

    Ok(StartOutcome {
        task: key.to_string(),
        paused,
        restarted,
    })
}

/// Mark `key` as completed and book the elapsed time.
///
/// Dependencies are not checked, and a task that was never started
/// completes with a duration of 0.
pub fn complete(
    doc: &mut ProgressDocument,
    tasks: &TaskTable,
    key: &str,
    now: DateTime<FixedOffset>,
) -> Result<CompleteOutcome> {
    if !tasks.contains(key) {
        return Err(PlanError::TaskNotFound(key.to_string()));
    }
    if doc.is_completed(key) {
        return Err(PlanError::AlreadyCompleted(key.to_string()));
    }

    let completed_at = timestamp(now);
    let previous_record = doc.tasks.remove(key);
    let started_at = previous_record.as_ref().and_then(TaskProgress::started_at);
    let duration_minutes = started_at
        .map(|started| elapsed_minutes(started, completed_at))
        .unwrap_or(0);
    let carried = previous_record
        .map(TaskProgress::into_extra)
        .unwrap_or_default();

    doc.tasks.insert(
        key.to_string(),
        TaskProgress::completed(started_at, completed_at, duration_minutes).with_extra(carried),
    );
    if doc.current_task.as_deref() == Some(key) {
        doc.current_task = None;
    }
    doc.total_study_time += duration_minutes;

    let today = now.date_naive();
    let entry = doc.daily_entry_mut(today);
    entry.tasks_completed.push(key.to_string());
    entry.minutes += duration_minutes;
    doc.last_study_date = Some(today);

    let completed_count = doc.completed_count();
    let milestone = completed_count == 1 || completed_count % 5 == 0;

    info!(
        task = %key,
        duration_minutes,
        total_study_time = doc.total_study_time,
        "task completed"
    );

    Ok(CompleteOutcome {
        task: key.to_string(),
        duration_minutes,
        total_study_time: doc.total_study_time,
        completed_count,
        milestone,
    })
}

/// Stored timestamps are UTC with millisecond precision.
pub(crate) fn timestamp(now: DateTime<FixedOffset>) -> DateTime<Utc> {
    now.with_timezone(&Utc).trunc_subsecs(3)
}

/// Whole minutes between two instants, rounding halves up.
///
/// Negative spans (clock skew, hand-edited data) stay negative.
pub fn elapsed_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    (ms as f64 / 60_000.0 + 0.5).floor() as i64
}

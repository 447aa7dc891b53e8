// src/render/tasks.rs

//! Output of the task commands: `list`, `start`, `complete`, `next`.

use std::io::{self, Write};

use chrono::FixedOffset;

use crate::dag::TaskState;
use crate::engine::{CompleteOutcome, PlanSnapshot, StartOutcome};
use crate::errors::PlanError;
use crate::health::stats::minutes_to_hours;
use crate::plan::definition::TaskDefinition;

use super::{heading, Painter};

const LIST_WIDTH: usize = 70;

fn or_unknown(value: Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

fn deps_label(task: &TaskDefinition) -> String {
    if task.deps.is_empty() {
        "none".to_string()
    } else {
        task.deps.join(", ")
    }
}

fn state_icon(painter: Painter, state: TaskState) -> String {
    match state {
        TaskState::Completed => painter.green("✅"),
        TaskState::InProgress => painter.yellow("🔄"),
        TaskState::Available => painter.blue("⏳"),
        TaskState::Locked => painter.red("🔒"),
    }
}

/// `list [--today]`: tasks in plan order, grouped under a header whenever
/// the stage changes. `offset` is used to show completion dates as local
/// dates.
pub fn task_list(
    w: &mut impl Write,
    painter: Painter,
    snapshot: &PlanSnapshot,
    today_only: bool,
    offset: FixedOffset,
) -> io::Result<()> {
    let readiness = snapshot.readiness();
    heading(w, painter, "📋 Learning Plan Tasks", LIST_WIDTH)?;

    let mut current_stage = None;
    for (key, task) in snapshot.tasks().iter() {
        let state = readiness.state_of(key);
        // Same filter as `available_tasks`, so the count below matches.
        if today_only && !(state.can_start() && readiness.is_satisfied(key)) {
            continue;
        }

        if current_stage != Some(task.stage) {
            current_stage = Some(task.stage);
            writeln!(w)?;
            writeln!(w, "{}", painter.cyan(format!("🎯 Stage {}", task.stage)))?;
            writeln!(w, "{}", "-".repeat(LIST_WIDTH))?;
        }

        writeln!(w, "{} [{}] {}", state_icon(painter, state), painter.bold(key), task.name)?;
        writeln!(
            w,
            "   Week {}, Day {} | {} | Deps: {}",
            or_unknown(task.week),
            or_unknown(task.day),
            painter.yellow(&task.duration),
            deps_label(task)
        )?;
        if let Some(done) = snapshot
            .progress
            .tasks
            .get(key)
            .and_then(|record| record.completed_at())
        {
            let local = done.with_timezone(&offset);
            writeln!(w, "   {} Completed: {}", painter.green("✓"), local.format("%Y-%m-%d"))?;
        }
        writeln!(w)?;
    }

    if today_only {
        let ready = readiness.available_tasks().len();
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            painter.cyan(format!("📌 You have {ready} task(s) ready to start"))
        )?;
    }
    Ok(())
}

pub fn started(
    w: &mut impl Write,
    painter: Painter,
    snapshot: &PlanSnapshot,
    outcome: &StartOutcome,
) -> io::Result<()> {
    if let Some(previous) = &outcome.paused {
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            painter.yellow(format!("⚠️  Previous task \"{previous}\" was in progress"))
        )?;
        writeln!(w, "{}", painter.cyan("Marking it as paused"))?;
    }

    let name = task_name(snapshot, &outcome.task);
    writeln!(w)?;
    let verb = if outcome.restarted { "Restarted" } else { "Started" };
    writeln!(
        w,
        "{}",
        painter.green(format!("🚀 {verb} Task: [{}] {name}", outcome.task))
    )?;
    writeln!(w)?;
    writeln!(w, "{}", painter.cyan("When finished, run:"))?;
    writeln!(w, "{}", painter.bold(format!("  studyplan complete {}", outcome.task)))?;
    writeln!(w)
}

pub fn completed(
    w: &mut impl Write,
    painter: Painter,
    snapshot: &PlanSnapshot,
    outcome: &CompleteOutcome,
    next_count: usize,
) -> io::Result<()> {
    let name = task_name(snapshot, &outcome.task);
    writeln!(w)?;
    writeln!(
        w,
        "{}",
        painter.green(format!("✅ Task Completed: [{}] {name}", outcome.task))
    )?;
    if outcome.duration_minutes > 0 {
        writeln!(
            w,
            "{}",
            painter.cyan(format!("⏱️  Time spent: {} minutes", outcome.duration_minutes))
        )?;
    }
    writeln!(
        w,
        "{}",
        painter.blue(format!(
            "📊 Total study time: {} hours",
            minutes_to_hours(outcome.total_study_time)
        ))
    )?;
    writeln!(w)?;
    if outcome.milestone {
        writeln!(
            w,
            "{}",
            painter.magenta(format!("🎉 Milestone: {} tasks completed!", outcome.completed_count))
        )?;
    }
    next_tasks(w, painter, snapshot, next_count)
}

/// The first `count` tasks that can be started, or a closing message.
pub fn next_tasks(
    w: &mut impl Write,
    painter: Painter,
    snapshot: &PlanSnapshot,
    count: usize,
) -> io::Result<()> {
    let readiness = snapshot.readiness();
    let next = readiness.next_recommended(count);

    if next.is_empty() {
        writeln!(w)?;
        let all_done = snapshot
            .tasks()
            .keys()
            .all(|key| snapshot.progress.is_completed(key));
        if all_done {
            writeln!(w, "{}", painter.green("🎊 Congratulations! All tasks completed!"))?;
            writeln!(w, "{}", painter.cyan("You've finished your learning plan!"))?;
        } else {
            writeln!(w, "{}", painter.yellow("No task is ready to start."))?;
            writeln!(w, "{}", painter.cyan("Run `studyplan check` to inspect dependencies"))?;
        }
        return Ok(());
    }

    writeln!(w)?;
    writeln!(w, "{}", painter.bold("📌 Recommended Next Steps:"))?;
    writeln!(w)?;
    for (index, key) in next.iter().enumerate() {
        let Some(task) = snapshot.tasks().get(key) else {
            continue;
        };
        writeln!(w, "{}. [{}] {}", index + 1, painter.bold(key), task.name)?;
        writeln!(
            w,
            "   Stage {}, Week {} | {}",
            task.stage,
            or_unknown(task.week),
            painter.yellow(&task.duration)
        )?;
        writeln!(w)?;
    }
    writeln!(w, "{}", painter.cyan("Run: studyplan start <task-id> to begin"))?;
    writeln!(w)
}

/// Explain a refused `start`/`complete`.
pub fn refusal(w: &mut impl Write, painter: Painter, err: &PlanError) -> io::Result<()> {
    match err {
        PlanError::TaskNotFound(key) => {
            writeln!(w, "{}", painter.red(format!("❌ Task {key} not found")))?;
            writeln!(w, "{}", painter.cyan("Run `studyplan list` to see task ids"))
        }
        PlanError::PrerequisitesNotMet { task, blocking } => {
            writeln!(
                w,
                "{}",
                painter.red(format!("❌ Prerequisites not met for task {task}"))
            )?;
            writeln!(w)?;
            writeln!(w, "{}", painter.yellow("Complete these tasks first:"))?;
            for dep in blocking {
                writeln!(w, "  🔒 {dep}")?;
            }
            Ok(())
        }
        PlanError::AlreadyCompleted(key) => {
            writeln!(w, "{}", painter.yellow(format!("Task {key} is already completed")))
        }
        other => writeln!(w, "{}", painter.red(format!("❌ {other}"))),
    }
}

fn task_name<'a>(snapshot: &'a PlanSnapshot, key: &str) -> &'a str {
    snapshot
        .tasks()
        .get(key)
        .map_or("", |task| task.name.as_str())
}

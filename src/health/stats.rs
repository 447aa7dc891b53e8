// src/health/stats.rs

//! Numbers behind the `progress` dashboard and `stats`.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::config::Settings;
use crate::engine::PlanSnapshot;
use crate::plan::progress::TaskStatus;

/// Round to one decimal place, halves up.
pub fn round1(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

pub fn minutes_to_hours(minutes: i64) -> f64 {
    round1(minutes as f64 / 60.0)
}

/// `round(part / total * 100)`; 0 for an empty whole.
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0 + 0.5).floor() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageProgress {
    pub stage: u32,
    pub total: usize,
    pub completed: usize,
}

impl StageProgress {
    pub fn percent(&self) -> u32 {
        percent(self.completed, self.total)
    }
}

/// Everything the `progress` command shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub stages: Vec<StageProgress>,
    pub start_date: DateTime<Utc>,
    pub total_study_minutes: i64,
    /// Days since `lastStudyDate`; `None` before the first completion.
    pub days_since_study: Option<i64>,
}

impl Dashboard {
    pub fn percent(&self) -> u32 {
        percent(self.completed, self.total)
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed + self.in_progress)
    }
}

/// Counts only cover defined tasks; orphaned progress entries are ignored.
pub fn dashboard(snapshot: &PlanSnapshot, today: NaiveDate) -> Dashboard {
    let tasks = snapshot.tasks();
    let progress = &snapshot.progress;
    let count = |status: TaskStatus| {
        tasks
            .keys()
            .filter(|key| progress.status_of(key) == status)
            .count()
    };

    let stages = tasks
        .stages()
        .into_iter()
        .map(|stage| {
            let keys: Vec<&str> = tasks
                .iter()
                .filter(|(_, t)| t.stage == stage)
                .map(|(key, _)| key)
                .collect();
            StageProgress {
                stage,
                total: keys.len(),
                completed: keys.iter().filter(|key| progress.is_completed(key)).count(),
            }
        })
        .collect();

    Dashboard {
        total: tasks.len(),
        completed: count(TaskStatus::Completed),
        in_progress: count(TaskStatus::InProgress),
        stages,
        start_date: progress.start_date,
        total_study_minutes: progress.total_study_time,
        days_since_study: progress
            .last_study_date
            .map(|last| (today - last).num_days()),
    }
}

/// One row of the last-seven-days chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub minutes: i64,
}

impl DayActivity {
    pub const BAR_WIDTH: usize = 20;

    pub fn hours(&self) -> f64 {
        minutes_to_hours(self.minutes)
    }

    /// Half an hour per cell, capped at [`Self::BAR_WIDTH`].
    pub fn bar_len(&self) -> usize {
        let cells = (self.hours() * 2.0 + 0.5).floor().max(0.0) as usize;
        cells.min(Self::BAR_WIDTH)
    }
}

/// Everything the `stats` command shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyStats {
    /// Days with a daily log entry.
    pub study_days: usize,
    /// Hours per study day, one decimal.
    pub average_daily_hours: f64,
    /// Oldest first, ending today.
    pub last_week: Vec<DayActivity>,
    pub remaining_tasks: usize,
    pub remaining_minutes: i64,
    /// `None` when there is no pace to project from.
    pub days_at_current_pace: Option<u64>,
    pub streak: u32,
}

pub fn study_stats(snapshot: &PlanSnapshot, today: NaiveDate, settings: &Settings) -> StudyStats {
    let progress = &snapshot.progress;
    let tasks = snapshot.tasks();

    let study_days = progress.daily_log.len();
    let average_daily_hours = if study_days > 0 {
        round1(progress.total_study_time as f64 / study_days as f64 / 60.0)
    } else {
        0.0
    };

    let last_week = (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayActivity {
            date,
            minutes: progress.daily_log.get(&date).map_or(0, |d| d.minutes),
        })
        .collect();

    let completed = tasks.keys().filter(|key| progress.is_completed(key)).count();
    let remaining_tasks = tasks.len().saturating_sub(completed);
    let remaining_minutes = remaining_tasks as i64 * i64::from(settings.assumed_task_minutes());
    let days_at_current_pace = (average_daily_hours > 0.0)
        .then(|| (remaining_minutes as f64 / 60.0 / average_daily_hours).ceil() as u64);

    StudyStats {
        study_days,
        average_daily_hours,
        last_week,
        remaining_tasks,
        remaining_minutes,
        days_at_current_pace,
        streak: streak(snapshot, today),
    }
}

/// Consecutive logged days ending today, or ending yesterday when nothing
/// has been logged today yet.
pub fn streak(snapshot: &PlanSnapshot, today: NaiveDate) -> u32 {
    let log = &snapshot.progress.daily_log;
    let mut day = if log.contains_key(&today) {
        today
    } else {
        match today.pred_opt().filter(|yesterday| log.contains_key(yesterday)) {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    while log.contains_key(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, Utc};
use studyplan::fs::mock::MockFileSystem;
use studyplan::plan::{PlanDefinition, ProgressDocument, TaskDefinition, TaskProgress};

use crate::PLAN_ROOT;

/// Builder for `PlanDefinition` to simplify test setup.
pub struct PlanBuilder {
    plan: PlanDefinition,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            plan: PlanDefinition {
                name: Some("Test Plan".to_string()),
                duration: Some("4 weeks".to_string()),
                ..PlanDefinition::default()
            },
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.plan.name = Some(name.to_string());
        self
    }

    pub fn with_task(mut self, key: &str, task: TaskDefinition) -> Self {
        self.plan.tasks.insert(key.to_string(), task);
        self
    }

    /// A well-formed stage-1 task with the given dependencies.
    pub fn with_simple(self, key: &str, deps: &[&str]) -> Self {
        let mut task = TaskBuilder::new(&format!("Task {key}"));
        for dep in deps {
            task = task.dep(dep);
        }
        self.with_task(key, task.build())
    }

    pub fn build(self) -> PlanDefinition {
        self.plan
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.plan).expect("plan serialises")
    }

    /// Write the plan to `data/config.json` under the mock plan root.
    pub fn write_to(&self, fs: &MockFileSystem) {
        fs.add_file(format!("{PLAN_ROOT}/data/config.json"), self.to_json());
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskDefinition`.
pub struct TaskBuilder {
    task: TaskDefinition,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            task: TaskDefinition {
                name: name.to_string(),
                stage: 1,
                week: Some(1),
                day: Some(1),
                duration: "2h".to_string(),
                deps: vec![],
            },
        }
    }

    pub fn stage(mut self, stage: u32) -> Self {
        self.task.stage = stage;
        self
    }

    pub fn week(mut self, week: Option<u32>) -> Self {
        self.task.week = week;
        self
    }

    pub fn day(mut self, day: Option<u32>) -> Self {
        self.task.day = day;
        self
    }

    pub fn duration(mut self, duration: &str) -> Self {
        self.task.duration = duration.to_string();
        self
    }

    pub fn dep(mut self, dep: &str) -> Self {
        self.task.deps.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskDefinition {
        self.task
    }
}

/// Builder for `ProgressDocument`.
pub struct ProgressBuilder {
    doc: ProgressDocument,
}

impl ProgressBuilder {
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            doc: ProgressDocument::new(start.to_utc()),
        }
    }

    pub fn in_progress(mut self, key: &str, started: DateTime<FixedOffset>) -> Self {
        self.doc.tasks.insert(
            key.to_string(),
            TaskProgress::in_progress(started.to_utc()),
        );
        self.doc.current_task = Some(key.to_string());
        self
    }

    pub fn completed(mut self, key: &str, completed: DateTime<FixedOffset>, minutes: i64) -> Self {
        let completed_at: DateTime<Utc> = completed.to_utc();
        self.doc.tasks.insert(
            key.to_string(),
            TaskProgress::completed(
                Some(completed_at - chrono::Duration::minutes(minutes)),
                completed_at,
                minutes,
            ),
        );
        self.doc.total_study_time += minutes;
        let day = completed.date_naive();
        let entry = self.doc.daily_entry_mut(day);
        entry.tasks_completed.push(key.to_string());
        entry.minutes += minutes;
        self.doc.last_study_date = Some(day);
        self
    }

    pub fn extra(mut self, field: &str, value: serde_json::Value) -> Self {
        self.doc.extra.insert(field.to_string(), value);
        self
    }

    pub fn build(self) -> ProgressDocument {
        self.doc
    }

    /// Write the document to `data/progress.json` under the mock plan root.
    pub fn write_to(self, fs: &MockFileSystem) -> ProgressDocument {
        let text = serde_json::to_string_pretty(&self.doc).expect("progress serialises");
        fs.add_file(format!("{PLAN_ROOT}/data/progress.json"), text);
        self.doc
    }
}

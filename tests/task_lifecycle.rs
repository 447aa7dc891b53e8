// tests/task_lifecycle.rs

mod common;

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{TimeDelta, Utc};
use common::{
    at, at_offset, date, init_tracing, mock_workspace, sample_plan, PlanBuilder, ProgressBuilder,
    PROGRESS_PATH,
};
use studyplan::engine::lifecycle::{self, elapsed_minutes};
use studyplan::errors::PlanError;
use studyplan::fs::mock::MockFileSystem;
use studyplan::fs::FileSystem;
use studyplan::plan::{ProgressDocument, TaskProgress, TaskStatus};
use tracing::Level;

fn fresh() -> ProgressDocument {
    ProgressBuilder::new(at(2026, 3, 1, 8, 0)).build()
}

#[test]
fn test_start_then_complete_books_elapsed_minutes() {
    let plan = sample_plan().build();
    let mut doc = fresh();

    let started = lifecycle::start(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 9, 0)).unwrap();
    assert_eq!(started.paused, None);
    assert!(!started.restarted);
    assert_eq!(doc.current_task.as_deref(), Some("1.1"));
    assert_eq!(doc.status_of("1.1"), TaskStatus::InProgress);

    let done = lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 10, 30)).unwrap();
    assert_eq!(done.duration_minutes, 90);
    assert_eq!(done.total_study_time, 90);
    assert_eq!(done.completed_count, 1);
    assert!(done.milestone);

    assert_eq!(doc.current_task, None);
    assert_eq!(doc.total_study_time, 90);
    assert_eq!(doc.last_study_date, Some(date(2026, 3, 1)));
    let day = &doc.daily_log[&date(2026, 3, 1)];
    assert_eq!(day.tasks_started, vec!["1.1"]);
    assert_eq!(day.tasks_completed, vec!["1.1"]);
    assert_eq!(day.minutes, 90);
}

#[test]
fn test_start_refused_until_dependencies_complete() {
    let plan = sample_plan().build();
    let mut doc = fresh();

    let result = lifecycle::start(&mut doc, &plan.tasks, "1.2", at(2026, 3, 1, 9, 0));
    match result {
        Err(PlanError::PrerequisitesNotMet { task, blocking }) => {
            assert_eq!(task, "1.2");
            assert_eq!(blocking.len(), 1);
            assert_eq!(blocking[0].key, "1.1");
            assert_eq!(blocking[0].name.as_deref(), Some("Install toolchain"));
        }
        other => panic!("Expected PrerequisitesNotMet, got: {:?}", other),
    }
    assert_eq!(doc, fresh());

    lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 9, 5)).unwrap();
    assert!(lifecycle::start(&mut doc, &plan.tasks, "1.2", at(2026, 3, 1, 9, 10)).is_ok());
}

#[test]
fn test_unknown_and_completed_tasks_are_refused() {
    let plan = sample_plan().build();
    let mut doc = fresh();

    match lifecycle::start(&mut doc, &plan.tasks, "9.9", at(2026, 3, 1, 9, 0)) {
        Err(PlanError::TaskNotFound(key)) => assert_eq!(key, "9.9"),
        other => panic!("Expected TaskNotFound, got: {:?}", other),
    }
    match lifecycle::complete(&mut doc, &plan.tasks, "9.9", at(2026, 3, 1, 9, 0)) {
        Err(PlanError::TaskNotFound(_)) => {}
        other => panic!("Expected TaskNotFound, got: {:?}", other),
    }

    lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 9, 0)).unwrap();
    let snapshot = doc.clone();
    for result in [
        lifecycle::start(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 10, 0)).map(|_| ()),
        lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 10, 0)).map(|_| ()),
    ] {
        match result {
            Err(err @ PlanError::AlreadyCompleted(_)) => assert!(err.is_refusal()),
            other => panic!("Expected AlreadyCompleted, got: {:?}", other),
        }
    }
    assert_eq!(doc, snapshot);
}

#[test]
fn test_complete_without_start_takes_zero_minutes() {
    let plan = sample_plan().build();
    let mut doc = fresh();

    let done = lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 9, 0)).unwrap();
    assert_eq!(done.duration_minutes, 0);
    match &doc.tasks["1.1"] {
        TaskProgress::Completed { started_at, .. } => assert_eq!(*started_at, None),
        other => panic!("Expected completed record, got: {:?}", other),
    }
    // The daily log still gets an entry with zero minutes.
    assert_eq!(doc.daily_log[&date(2026, 3, 1)].minutes, 0);
}

#[test]
fn test_complete_ignores_dependencies() {
    let plan = sample_plan().build();
    let mut doc = fresh();

    assert!(lifecycle::complete(&mut doc, &plan.tasks, "2.1", at(2026, 3, 1, 9, 0)).is_ok());
}

#[test]
fn test_starting_another_task_pauses_the_current_one() {
    let plan = PlanBuilder::new()
        .with_simple("A", &[])
        .with_simple("B", &[])
        .build();
    let mut doc = fresh();

    lifecycle::start(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 9, 0)).unwrap();
    let outcome = lifecycle::start(&mut doc, &plan.tasks, "B", at(2026, 3, 1, 9, 30)).unwrap();

    assert_eq!(outcome.paused.as_deref(), Some("A"));
    assert_eq!(doc.current_task.as_deref(), Some("B"));
    // The paused task keeps its record.
    assert_eq!(doc.status_of("A"), TaskStatus::InProgress);
    assert_eq!(doc.in_progress_count(), 2);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_pausing_a_task_logs_a_warning() {
    let plan = PlanBuilder::new()
        .with_simple("A", &[])
        .with_simple("B", &[])
        .build();
    let mut doc = fresh();
    lifecycle::start(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 9, 0)).unwrap();

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        lifecycle::start(&mut doc, &plan.tasks, "B", at(2026, 3, 1, 9, 30)).unwrap();
    });

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("previous task paused"), "{output}");
    assert!(!output.contains("task started"), "{output}");
}

#[test]
fn test_restart_resets_start_time() {
    let plan = PlanBuilder::new().with_simple("A", &[]).build();
    let mut doc = fresh();

    lifecycle::start(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 9, 0)).unwrap();
    let outcome = lifecycle::start(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 11, 0)).unwrap();
    assert!(outcome.restarted);
    assert_eq!(outcome.paused, None);

    let done = lifecycle::complete(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 11, 45)).unwrap();
    assert_eq!(done.duration_minutes, 45);
    assert_eq!(
        doc.daily_log[&date(2026, 3, 1)].tasks_started,
        vec!["A", "A"]
    );
}

#[test]
fn test_work_across_midnight_is_logged_on_completion_day() {
    let plan = PlanBuilder::new().with_simple("A", &[]).build();
    let mut doc = fresh();

    lifecycle::start(&mut doc, &plan.tasks, "A", at(2026, 3, 1, 23, 50)).unwrap();
    let done = lifecycle::complete(&mut doc, &plan.tasks, "A", at(2026, 3, 2, 0, 20)).unwrap();

    assert_eq!(done.duration_minutes, 30);
    assert_eq!(doc.daily_log[&date(2026, 3, 1)].minutes, 0);
    assert_eq!(doc.daily_log[&date(2026, 3, 1)].tasks_started, vec!["A"]);
    assert_eq!(doc.daily_log[&date(2026, 3, 2)].minutes, 30);
    assert_eq!(doc.last_study_date, Some(date(2026, 3, 2)));
}

#[test]
fn test_daily_log_uses_local_date() {
    let plan = PlanBuilder::new().with_simple("A", &[]).build();
    let mut doc = fresh();

    // 01:30 on March 2nd at UTC+2 is still March 1st in UTC.
    let now = at_offset(2026, 3, 2, 1, 30, 2);
    lifecycle::complete(&mut doc, &plan.tasks, "A", now).unwrap();

    assert!(doc.daily_log.contains_key(&date(2026, 3, 2)));
    let completed_at = doc.tasks["A"].completed_at().unwrap();
    assert_eq!(completed_at.date_naive(), date(2026, 3, 1));
}

#[test]
fn test_milestones_on_first_and_every_fifth_completion() {
    let mut builder = PlanBuilder::new();
    for i in 1..=10 {
        builder = builder.with_simple(&format!("t{i}"), &[]);
    }
    let plan = builder.build();
    let mut doc = fresh();

    let milestones: Vec<bool> = (1..=10)
        .map(|i| {
            lifecycle::complete(&mut doc, &plan.tasks, &format!("t{i}"), at(2026, 3, 1, 9, i))
                .unwrap()
                .milestone
        })
        .collect();

    assert_eq!(
        milestones,
        vec![true, false, false, false, true, false, false, false, false, true]
    );
}

#[test]
fn test_negative_duration_propagates_to_every_total() {
    let plan = sample_plan().build();
    let mut doc = ProgressBuilder::new(at(2026, 3, 1, 8, 0))
        .in_progress("1.1", at(2026, 3, 2, 10, 0))
        .build();

    // The clock now reads earlier than the recorded start.
    let done = lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 2, 9, 20)).unwrap();
    assert_eq!(done.duration_minutes, -40);
    assert_eq!(done.total_study_time, -40);
    assert_eq!(doc.total_study_time, -40);
    assert_eq!(doc.daily_log[&date(2026, 3, 2)].minutes, -40);
    match &doc.tasks["1.1"] {
        TaskProgress::Completed {
            duration_minutes, ..
        } => assert_eq!(*duration_minutes, -40),
        other => panic!("Expected completed record, got: {:?}", other),
    }
}

#[test]
fn test_transitions_carry_unknown_record_fields() {
    let plan = sample_plan().build();
    let mut doc = fresh();
    let mut notes = serde_json::Map::new();
    notes.insert("notes".to_string(), serde_json::json!("read chapter 2 first"));
    doc.tasks.insert(
        "1.1".to_string(),
        TaskProgress::in_progress(at(2026, 3, 1, 9, 0).to_utc()).with_extra(notes.clone()),
    );

    lifecycle::start(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 9, 30)).unwrap();
    assert_eq!(doc.tasks["1.1"].extra(), &notes);

    lifecycle::complete(&mut doc, &plan.tasks, "1.1", at(2026, 3, 1, 10, 0)).unwrap();
    assert_eq!(doc.status_of("1.1"), TaskStatus::Completed);
    assert_eq!(doc.tasks["1.1"].extra(), &notes);
}

#[test]
fn test_elapsed_minutes_rounds_half_up() {
    let start = Utc::now();
    assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(89)), 1);
    assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(90)), 2);
    assert_eq!(elapsed_minutes(start, start + TimeDelta::milliseconds(29_999)), 0);
    assert_eq!(elapsed_minutes(start, start + TimeDelta::seconds(30)), 1);
    assert_eq!(elapsed_minutes(start, start - TimeDelta::minutes(5)), -5);
}

#[test]
fn test_workspace_persists_start_and_complete() {
    init_tracing();
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);

    let ws = mock_workspace(&fs, at(2026, 3, 1, 9, 0));
    let mut snapshot = ws.snapshot().unwrap();
    assert!(!snapshot.progress_on_disk);

    ws.start(&mut snapshot, "1.1").unwrap();
    assert!(snapshot.progress_on_disk);
    assert!(fs.is_file(Path::new(PROGRESS_PATH)));

    let later = mock_workspace(&fs, at(2026, 3, 1, 10, 0));
    let mut snapshot = later.snapshot().unwrap();
    assert_eq!(snapshot.progress.status_of("1.1"), TaskStatus::InProgress);

    let done = later.complete(&mut snapshot, "1.1").unwrap();
    assert_eq!(done.duration_minutes, 60);

    let reloaded = later.snapshot().unwrap();
    assert_eq!(reloaded.progress, snapshot.progress);
    assert_eq!(reloaded.progress.total_study_time, 60);
}

#[test]
fn test_refused_start_writes_nothing() {
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 3, 1, 9, 0));

    let mut snapshot = ws.snapshot().unwrap();
    let before = snapshot.progress.clone();
    assert!(ws.start(&mut snapshot, "2.1").is_err());

    assert!(!fs.exists(Path::new(PROGRESS_PATH)));
    assert_eq!(snapshot.progress, before);
    assert!(!snapshot.progress_on_disk);
}

#[test]
fn test_missing_definitions_is_fatal() {
    let fs = MockFileSystem::new();
    let ws = mock_workspace(&fs, at(2026, 3, 1, 9, 0));

    match ws.snapshot() {
        Err(PlanError::ConfigNotFound(path)) => assert!(path.ends_with("data/config.json")),
        other => panic!("Expected ConfigNotFound, got: {:?}", other),
    }
}

#[test]
fn test_malformed_progress_is_fatal_for_lifecycle() {
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);
    fs.add_file(PROGRESS_PATH, "{ not json");
    let ws = mock_workspace(&fs, at(2026, 3, 1, 9, 0));

    match ws.snapshot() {
        Err(PlanError::MalformedJson { path, .. }) => {
            assert!(path.ends_with("data/progress.json"))
        }
        other => panic!("Expected MalformedJson, got: {:?}", other),
    }
    assert_eq!(
        fs.read_to_string(Path::new(PROGRESS_PATH)).unwrap(),
        "{ not json"
    );
}

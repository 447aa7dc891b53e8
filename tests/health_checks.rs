// tests/health_checks.rs

mod common;

use common::{
    at, mock_workspace, mock_workspace_with, sample_plan, PlanBuilder, ProgressBuilder,
    TaskBuilder, CONFIG_PATH, PLAN_ROOT, PROGRESS_PATH,
};
use studyplan::config::{RawSettingsFile, Settings, SettingsSection};
use studyplan::fs::mock::MockFileSystem;
use studyplan::health::{
    diagnose, health_check, verify, CheckResult, CheckStatus, DependencyStatus, Finding,
    Verdict, Verification,
};

fn find<'a>(checks: &'a [CheckResult], name: &str) -> &'a CheckResult {
    checks
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("no check named {name:?} in {checks:#?}"))
}

fn healthy_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);
    fs.add_dir(format!("{PLAN_ROOT}/scripts"));
    ProgressBuilder::new(at(2026, 5, 1, 8, 0))
        .completed("1.1", at(2026, 5, 1, 10, 0), 60)
        .write_to(&fs);
    fs
}

#[test]
fn test_healthy_plan_is_ready() {
    let fs = healthy_fs();
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    let report = health_check(&ws, Some(&plan.tasks));
    let tally = report.tally();
    assert_eq!(tally.fail, 0, "{:#?}", report.checks);
    assert_eq!(tally.warning, 0, "{:#?}", report.checks);
    assert_eq!(tally.verdict(), Verdict::Ready);
    assert!(report.checks.iter().all(CheckResult::is_pass));
}

#[test]
fn test_empty_directory_is_critical() {
    let fs = MockFileSystem::new();
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));

    let report = health_check(&ws, None);
    assert_eq!(find(&report.checks, "File: config.json").status, CheckStatus::Fail);
    assert_eq!(find(&report.checks, "File: progress.json").status, CheckStatus::Warning);
    assert_eq!(find(&report.checks, "Directory: scripts/").status, CheckStatus::Warning);
    assert_eq!(find(&report.checks, "Config: JSON validity").status, CheckStatus::Fail);
    assert_eq!(report.tally().verdict(), Verdict::Critical);
}

#[test]
fn test_dependency_problems_fail_the_check() {
    let fs = MockFileSystem::new();
    PlanBuilder::new()
        .with_simple("A", &["B"])
        .with_simple("B", &["A"])
        .with_simple("C", &["nowhere"])
        .with_task("4.1", TaskBuilder::new("Floating").stage(4).build())
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    let report = health_check(&ws, Some(&plan.tasks));
    let existence = find(&report.checks, "Dependencies: existence");
    assert_eq!(existence.status, CheckStatus::Fail);
    assert!(existence.message.contains("C→nowhere"));

    let circular = find(&report.checks, "Dependencies: circular check");
    assert_eq!(circular.status, CheckStatus::Fail);
    assert_eq!(circular.message, "Circular: A→B→A; B→A→B");

    let orphans = find(&report.checks, "Dependencies: orphaned tasks");
    assert_eq!(orphans.status, CheckStatus::Warning);
    assert!(orphans.message.contains("4.1"));
}

#[test]
fn test_badly_formed_tasks_are_listed() {
    let fs = MockFileSystem::new();
    PlanBuilder::new()
        .with_simple("1.1", &[])
        .with_task("1.2", TaskBuilder::new("").build())
        .with_task("1.3", TaskBuilder::new("No week").week(None).build())
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));

    let report = health_check(&ws, Some(&ws.load_definitions().unwrap().tasks));
    let format = find(&report.checks, "Tasks: format validation");
    assert_eq!(format.status, CheckStatus::Fail);
    assert_eq!(format.message, "Invalid format in tasks: 1.2, 1.3");
}

#[test]
fn test_progress_problems_are_reported() {
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);
    ProgressBuilder::new(at(2026, 5, 1, 8, 0))
        .completed("ghost", at(2026, 5, 1, 9, 0), 5)
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    let report = health_check(&ws, Some(&plan.tasks));
    let orphaned = find(&report.checks, "Progress: orphaned entries");
    assert_eq!(orphaned.status, CheckStatus::Warning);
    assert_eq!(orphaned.message, "1 orphaned: ghost");

    fs.add_file(PROGRESS_PATH, r#"{ "tasks": {} }"#);
    let report = health_check(&ws, Some(&plan.tasks));
    assert_eq!(
        find(&report.checks, "Progress: data structure").status,
        CheckStatus::Fail
    );

    fs.add_file(PROGRESS_PATH, "not json at all");
    let report = health_check(&ws, Some(&plan.tasks));
    assert_eq!(
        find(&report.checks, "Progress: JSON validity").status,
        CheckStatus::Fail
    );
}

#[test]
fn test_malformed_definitions_still_produce_a_report() {
    let fs = MockFileSystem::new();
    fs.add_file(CONFIG_PATH, "{ \"tasks\": ");
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));

    assert!(ws.load_definitions_lenient().unwrap().is_none());
    let report = health_check(&ws, None);
    let validity = find(&report.checks, "Config: JSON validity");
    assert_eq!(validity.status, CheckStatus::Fail);
    assert!(validity.message.starts_with("Invalid JSON"));
    assert!(report.checks.iter().all(|c| !c.name.starts_with("Dependencies")));
}

#[test]
fn test_diagnose_summarises_plan_and_progress() {
    let fs = healthy_fs();
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    let diag = diagnose(&ws, &plan.tasks).unwrap();
    assert_eq!(diag.distribution, vec![(1, 2), (2, 2)]);
    assert_eq!(diag.max_depth, Some(2));
    // 2h + 2h + 3h + 90m
    assert!((diag.total_estimated_hours - 8.5).abs() < 1e-9);
    assert!((diag.average_estimated_hours - 2.125).abs() < 1e-9);

    let progress = diag.progress.unwrap();
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.total_study_minutes, 60);
    assert_eq!(progress.study_days, 1);
    assert!(diag.findings.is_empty());
}

#[test]
fn test_diagnose_flags_stuck_and_cyclic() {
    let fs = MockFileSystem::new();
    PlanBuilder::new()
        .with_simple("A", &["B"])
        .with_simple("B", &["A"])
        .with_simple("C", &[])
        .write_to(&fs);
    ProgressBuilder::new(at(2026, 5, 1, 8, 0))
        .in_progress("C", at(2026, 5, 1, 9, 0))
        .write_to(&fs);

    let ws = mock_workspace(&fs, at(2026, 5, 20, 9, 0));
    let plan = ws.load_definitions().unwrap();
    let diag = diagnose(&ws, &plan.tasks).unwrap();

    assert_eq!(diag.max_depth, None);
    assert!(diag.findings.contains(&Finding::CyclicGraph));
    assert!(diag.findings.contains(&Finding::StuckTasks {
        days: 7,
        tasks: vec!["C".to_string()],
    }));
    assert!(diag.findings.iter().any(Finding::is_error));
}

#[test]
fn test_diagnose_recommendations_follow_settings() {
    let fs = MockFileSystem::new();
    PlanBuilder::new()
        .with_task("1.1", TaskBuilder::new("Long").duration("5h").build())
        .with_task("1.2", TaskBuilder::new("Longer").duration("6h").dep("1.1").build())
        .write_to(&fs);
    let settings = Settings::try_from(RawSettingsFile {
        settings: SettingsSection {
            deep_chain_depth: 0,
            ..SettingsSection::default()
        },
    })
    .unwrap();
    let ws = mock_workspace_with(&fs, at(2026, 5, 2, 8, 0), settings);
    let plan = ws.load_definitions().unwrap();

    let diag = diagnose(&ws, &plan.tasks).unwrap();
    assert_eq!(diag.progress, None);
    assert!(diag.findings.contains(&Finding::LongTasks { average_hours: 5.5 }));
    assert!(diag.findings.contains(&Finding::DeepChains { depth: 1 }));
}

#[test]
fn test_verify_task_reports_dependency_status() {
    let fs = MockFileSystem::new();
    PlanBuilder::new()
        .with_simple("1.1", &[])
        .with_simple("1.2", &[])
        .with_simple("1.3", &[])
        .with_simple("2.1", &["1.1", "1.2", "1.3", "9.9"])
        .write_to(&fs);
    ProgressBuilder::new(at(2026, 5, 1, 8, 0))
        .completed("1.1", at(2026, 5, 1, 9, 0), 20)
        .in_progress("1.2", at(2026, 5, 1, 10, 0))
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    let Verification::Task(task) = verify(&ws, Some(&plan.tasks), Some("2.1")).unwrap() else {
        panic!("Expected task verification");
    };
    let statuses: Vec<DependencyStatus> = task.dependencies.iter().map(|d| d.status).collect();
    assert_eq!(
        statuses,
        vec![
            DependencyStatus::Completed,
            DependencyStatus::InProgress,
            DependencyStatus::Pending,
            DependencyStatus::NotFound,
        ]
    );
    assert!(task.unlocks.is_empty());

    let Verification::Task(first) = verify(&ws, Some(&plan.tasks), Some("1.1")).unwrap() else {
        panic!("Expected task verification");
    };
    assert_eq!(first.unlocks, vec!["2.1"]);
}

#[test]
fn test_verify_targets() {
    let fs = healthy_fs();
    let ws = mock_workspace(&fs, at(2026, 5, 2, 8, 0));
    let plan = ws.load_definitions().unwrap();

    match verify(&ws, Some(&plan.tasks), Some("deps")).unwrap() {
        Verification::Dependencies(checks) => assert_eq!(checks.len(), 3),
        other => panic!("Expected dependency checks, got: {:?}", other),
    }
    match verify(&ws, Some(&plan.tasks), Some("nonsense")).unwrap() {
        Verification::General {
            unknown_target,
            checks,
        } => {
            assert_eq!(unknown_target.as_deref(), Some("nonsense"));
            assert!(!checks.is_empty());
        }
        other => panic!("Expected general checks, got: {:?}", other),
    }
    match verify(&ws, None, Some("deps")).unwrap() {
        Verification::General { .. } => {}
        other => panic!("Expected general checks, got: {:?}", other),
    }
}

// tests/cli_commands.rs

mod common;

use std::path::{Path, PathBuf};

use clap::Parser;
use common::{
    at, init_tracing, mock_workspace, run_command, sample_plan, ProgressBuilder, CONFIG_PATH,
    PROGRESS_PATH,
};
use studyplan::cli::{CliArgs, Command};
use studyplan::errors::PlanError;
use studyplan::fs::mock::MockFileSystem;
use studyplan::fs::FileSystem;
use studyplan::render::Painter;

fn plan_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    sample_plan().write_to(&fs);
    fs
}

#[test]
fn test_cli_parses_global_flags_after_subcommand() {
    let args = CliArgs::try_parse_from([
        "studyplan", "start", "1.2", "--root", "/tmp/plan", "--color", "never",
    ])
    .unwrap();

    assert_eq!(args.root, PathBuf::from("/tmp/plan"));
    match args.command {
        Command::Start { id } => assert_eq!(id, "1.2"),
        other => panic!("Expected start, got: {:?}", other),
    }
}

#[test]
fn test_cli_parses_flags() {
    let args = CliArgs::try_parse_from(["studyplan", "fix", "--dry-run"]).unwrap();
    assert!(matches!(args.command, Command::Fix { dry_run: true }));
    assert_eq!(args.root, PathBuf::from("."));

    let args = CliArgs::try_parse_from(["studyplan", "verify"]).unwrap();
    assert!(matches!(args.command, Command::Verify { target: None }));

    assert!(CliArgs::try_parse_from(["studyplan", "start"]).is_err());
}

#[test]
fn test_list_shows_states_and_stage_headers() {
    let fs = plan_fs();
    ProgressBuilder::new(at(2026, 8, 1, 8, 0))
        .completed("1.1", at(2026, 8, 1, 10, 0), 60)
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (code, out) = run_command(&ws, Command::List { today: false });
    assert_eq!(code, 0);
    assert!(out.contains("🎯 Stage 1"));
    assert!(out.contains("🎯 Stage 2"));
    assert!(out.contains("✅ [1.1] Install toolchain"));
    assert!(out.contains("⏳ [1.2] Hello world"));
    assert!(out.contains("🔒 [2.1] Ownership"));
    assert!(out.contains("Completed: 2026-08-01"));
    assert!(out.contains("Deps: 1.2"));
}

#[test]
fn test_list_today_only_shows_startable_tasks() {
    let fs = plan_fs();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (_, out) = run_command(&ws, Command::List { today: true });
    assert!(out.contains("[1.1]"));
    assert!(!out.contains("[1.2]"));
    assert!(out.contains("You have 1 task(s) ready to start"));
}

#[test]
fn test_start_and_complete_round_trip() {
    init_tracing();
    let fs = plan_fs();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 9, 0));

    let (code, out) = run_command(&ws, Command::Start { id: "1.1".into() });
    assert_eq!(code, 0);
    assert!(out.contains("🚀 Started Task: [1.1] Install toolchain"));
    assert!(out.contains("studyplan complete 1.1"));

    let ws = mock_workspace(&fs, at(2026, 8, 2, 10, 15));
    let (code, out) = run_command(&ws, Command::Complete { id: "1.1".into() });
    assert_eq!(code, 0);
    assert!(out.contains("✅ Task Completed: [1.1] Install toolchain"));
    assert!(out.contains("Time spent: 75 minutes"));
    assert!(out.contains("Total study time: 1.3 hours"));
    assert!(out.contains("Milestone: 1 tasks completed!"));
    assert!(out.contains("1. [1.2] Hello world"));
    assert!(out.contains("2. [2.2] Borrowing"));
}

#[test]
fn test_refusals_exit_one_without_writing() {
    let fs = plan_fs();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 9, 0));

    let (code, out) = run_command(&ws, Command::Start { id: "2.1".into() });
    assert_eq!(code, 1);
    assert!(out.contains("Prerequisites not met for task 2.1"));
    assert!(out.contains("🔒 1.2: Hello world"));

    let (code, out) = run_command(&ws, Command::Complete { id: "7.7".into() });
    assert_eq!(code, 1);
    assert!(out.contains("Task 7.7 not found"));

    assert!(!fs.exists(Path::new(PROGRESS_PATH)));
}

#[test]
fn test_missing_plan_is_an_error() {
    let fs = MockFileSystem::new();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 9, 0));

    let mut out = Vec::new();
    let result = studyplan::execute(&ws, &Command::Next, Painter::plain(), &mut out);
    assert!(matches!(result, Err(PlanError::ConfigNotFound(_))));
}

#[test]
fn test_next_when_everything_is_done() {
    let fs = plan_fs();
    let mut progress = ProgressBuilder::new(at(2026, 8, 1, 8, 0));
    for key in ["1.1", "1.2", "2.1", "2.2"] {
        progress = progress.completed(key, at(2026, 8, 1, 10, 0), 30);
    }
    progress.write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (_, out) = run_command(&ws, Command::Next);
    assert!(out.contains("Congratulations! All tasks completed!"));
}

#[test]
fn test_next_when_everything_is_blocked() {
    let fs = MockFileSystem::new();
    common::PlanBuilder::new()
        .with_simple("1.1", &["missing"])
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (_, out) = run_command(&ws, Command::Next);
    assert!(out.contains("No task is ready to start."));
    assert!(!out.contains("Congratulations"));
}

#[test]
fn test_progress_and_stats_render() {
    let fs = plan_fs();
    ProgressBuilder::new(at(2026, 8, 1, 8, 0))
        .completed("1.1", at(2026, 8, 1, 10, 0), 90)
        .completed("1.2", at(2026, 8, 2, 10, 0), 30)
        .write_to(&fs);
    let ws = mock_workspace(&fs, at(2026, 8, 2, 18, 0));

    let (code, out) = run_command(&ws, Command::Progress);
    assert_eq!(code, 0);
    assert!(out.contains("Overall Progress: 50%"));
    assert!(out.contains("Completed: 2/4 tasks"));
    assert!(out.contains("Stage 1: "));
    assert!(out.contains("100% (2/2)"));
    assert!(out.contains("Total Study Time: 2 hours"));
    assert!(out.contains("Studying today!"));

    let (code, out) = run_command(&ws, Command::Stats);
    assert_eq!(code, 0);
    assert!(out.contains("Study Days: 2"));
    assert!(out.contains("Average Daily: 1 hours"));
    assert!(out.contains("Current Streak: 2 days!"));
    assert!(out.contains("At Current Pace: 4 days"));
}

#[test]
fn test_reports_exit_zero_even_when_broken() {
    let fs = MockFileSystem::new();
    fs.add_file(CONFIG_PATH, "{ nope");
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (code, out) = run_command(&ws, Command::Check { verbose: false });
    assert_eq!(code, 0);
    assert!(out.contains("Critical issues found"));

    let (code, out) = run_command(&ws, Command::Diagnose);
    assert_eq!(code, 0);
    assert!(out.contains("Deep Diagnostics"));

    let (code, out) = run_command(&ws, Command::Verify { target: Some("deps".into()) });
    assert_eq!(code, 0);
    assert!(out.contains("Config: JSON validity"));

    let (code, out) = run_command(&ws, Command::Fix { dry_run: true });
    assert_eq!(code, 0);
    assert!(out.contains("DRY RUN"));
    assert!(out.contains("config.json does not parse"));
    assert_eq!(fs.read_to_string(Path::new(CONFIG_PATH)).unwrap(), "{ nope");
}

#[test]
fn test_check_verbose_shows_pass_messages() {
    let fs = plan_fs();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (_, quiet) = run_command(&ws, Command::Check { verbose: false });
    let (_, verbose) = run_command(&ws, Command::Check { verbose: true });
    assert!(!quiet.contains("All dependencies reference existing tasks"));
    assert!(verbose.contains("All dependencies reference existing tasks"));
}

#[test]
fn test_init_then_list() {
    let fs = MockFileSystem::new();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let (code, out) = run_command(&ws, Command::Init);
    assert_eq!(code, 0);
    assert!(out.contains("Created data/config.json"));
    assert!(out.contains("Created scripts/launch.sh (default)"));

    let (code, out) = run_command(&ws, Command::List { today: false });
    assert_eq!(code, 0);
    assert!(out.contains("[1.1] First task - define your goal"));
}

#[test]
fn test_colour_is_only_emitted_when_enabled() {
    let fs = plan_fs();
    let ws = mock_workspace(&fs, at(2026, 8, 2, 8, 0));

    let mut coloured = Vec::new();
    studyplan::execute(&ws, &Command::Next, Painter::new(true), &mut coloured).unwrap();
    let (_, plain) = run_command(&ws, Command::Next);

    assert!(String::from_utf8(coloured).unwrap().contains('\u{1b}'));
    assert!(!plain.contains('\u{1b}'));
}

#![allow(dead_code)]

pub use studyplan_test_utils::builders::{PlanBuilder, ProgressBuilder, TaskBuilder};
pub use studyplan_test_utils::{
    at, at_offset, date, init_tracing, mock_workspace, mock_workspace_with, PLAN_ROOT,
};

use studyplan::cli::Command;
use studyplan::engine::Workspace;
use studyplan::render::Painter;

pub const PROGRESS_PATH: &str = "/plan/data/progress.json";
pub const CONFIG_PATH: &str = "/plan/data/config.json";

/// Run one command with colour disabled and return `(exit code, output)`.
pub fn run_command(ws: &Workspace, command: Command) -> (i32, String) {
    let mut out = Vec::new();
    let code = studyplan::execute(ws, &command, Painter::plain(), &mut out)
        .expect("command should not fail");
    (code, String::from_utf8(out).expect("output is UTF-8"))
}

/// Plan used across the suites:
///
/// ```text
/// 1.1 ── 1.2 ── 2.1
///    └────────── 2.2
/// ```
pub fn sample_plan() -> PlanBuilder {
    PlanBuilder::new()
        .with_task("1.1", TaskBuilder::new("Install toolchain").build())
        .with_task(
            "1.2",
            TaskBuilder::new("Hello world").day(Some(2)).dep("1.1").build(),
        )
        .with_task(
            "2.1",
            TaskBuilder::new("Ownership")
                .stage(2)
                .week(Some(2))
                .duration("3h")
                .dep("1.2")
                .build(),
        )
        .with_task(
            "2.2",
            TaskBuilder::new("Borrowing")
                .stage(2)
                .week(Some(2))
                .duration("90m")
                .dep("1.1")
                .build(),
        )
}

// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod health;
pub mod logging;
pub mod plan;
pub mod render;
pub mod scaffold;
pub mod types;

use std::io::{self, Write};

use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::engine::Workspace;
use crate::errors::{PlanError, Result};
use crate::plan::definition::{PlanDefinition, TaskTable};
use crate::render::{reports, tasks, Painter};

/// High-level entry point used by `main.rs`.
///
/// Opens the plan directory named by `--root`, resolves colour, and runs the
/// subcommand against stdout. Returns the process exit code.
pub fn run(args: CliArgs) -> Result<i32> {
    let ws = Workspace::open(&args.root, args.settings.clone())?;
    let color = args.color.unwrap_or_else(|| ws.settings().color());
    let painter = Painter::new(color.enabled());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let code = execute(&ws, &args.command, painter, &mut out)?;
    out.flush()?;
    Ok(code)
}

/// Run one command against `ws`, writing user-facing output to `out`.
///
/// - A missing definitions document is an error for everything but `init`.
/// - Refused `start`/`complete` requests are explained on `out` and yield
///   exit code 1; nothing has been written in that case.
/// - Reports (`check`, `diagnose`, `verify`, `fix`) yield 0 whatever they
///   find.
pub fn execute(
    ws: &Workspace,
    command: &Command,
    painter: Painter,
    out: &mut impl Write,
) -> Result<i32> {
    debug!(?command, "executing command");
    let offset = *ws.now().offset();

    match command {
        Command::Init => {
            let report = scaffold::init(ws)?;
            reports::scaffold_report(out, painter, &report)?;
        }
        Command::List { today } => {
            let snapshot = ws.snapshot()?;
            tasks::task_list(out, painter, &snapshot, *today, offset)?;
        }
        Command::Start { id } => {
            let mut snapshot = ws.snapshot()?;
            match ws.start(&mut snapshot, id) {
                Ok(outcome) => tasks::started(out, painter, &snapshot, &outcome)?,
                Err(err) => return refused(out, painter, err),
            }
        }
        Command::Complete { id } => {
            let mut snapshot = ws.snapshot()?;
            match ws.complete(&mut snapshot, id) {
                Ok(outcome) => {
                    let next = ws.settings().next_count();
                    tasks::completed(out, painter, &snapshot, &outcome, next)?;
                }
                Err(err) => return refused(out, painter, err),
            }
        }
        Command::Progress => {
            let snapshot = ws.snapshot()?;
            let dash = health::dashboard(&snapshot, ws.today());
            reports::dashboard(out, painter, &dash, offset)?;
        }
        Command::Next => {
            let snapshot = ws.snapshot()?;
            tasks::next_tasks(out, painter, &snapshot, ws.settings().next_count())?;
        }
        Command::Stats => {
            let snapshot = ws.snapshot()?;
            let stats = health::study_stats(&snapshot, ws.today(), ws.settings());
            reports::study_stats(out, painter, &stats)?;
        }
        Command::Check { verbose } => {
            let plan = ws.load_definitions_lenient()?;
            let report = health::health_check(ws, plan.as_ref().map(|p| &p.tasks));
            reports::health_report(out, painter, &report, *verbose)?;
        }
        Command::Diagnose => {
            let plan = ws.load_definitions_lenient()?;
            let empty = TaskTable::new();
            let diag = health::diagnose(ws, table_or(&plan, &empty))?;
            reports::diagnosis(out, painter, &diag)?;
        }
        Command::Verify { target } => {
            let plan = ws.load_definitions_lenient()?;
            let verification =
                health::verify(ws, plan.as_ref().map(|p| &p.tasks), target.as_deref())?;
            reports::verification(out, painter, &verification)?;
        }
        Command::Fix { dry_run } => {
            let plan = ws.load_definitions_lenient()?;
            let report = ws.repair(plan.as_ref().map(|p| &p.tasks), *dry_run)?;
            reports::repair_report(out, painter, &report)?;
        }
    }

    Ok(0)
}

fn table_or<'a>(plan: &'a Option<PlanDefinition>, empty: &'a TaskTable) -> &'a TaskTable {
    plan.as_ref().map_or(empty, |p| &p.tasks)
}

fn refused(out: &mut impl Write, painter: Painter, err: PlanError) -> Result<i32> {
    if !err.is_refusal() {
        return Err(err);
    }
    debug!(error = %err, "request refused");
    tasks::refusal(out, painter, &err)?;
    Ok(1)
}

// src/render/reports.rs

//! Output of the report commands: `progress`, `stats`, `check`, `diagnose`,
//! `verify`, `fix` and `init`.

use std::io::{self, Write};

use chrono::FixedOffset;

use crate::engine::{Repair, RepairReport};
use crate::health::stats::{minutes_to_hours, round1};
use crate::health::{
    CheckResult, CheckStatus, Dashboard, DayActivity, DependencyStatus, Diagnosis, Finding,
    HealthReport, StudyStats, Verdict, Verification,
};
use crate::scaffold::{ScaffoldAction, ScaffoldReport};

use super::{cells, heading, progress_bar, rule, Painter};

const WIDTH: usize = 60;

pub fn dashboard(
    w: &mut impl Write,
    painter: Painter,
    dash: &Dashboard,
    offset: FixedOffset,
) -> io::Result<()> {
    heading(w, painter, "📊 Learning Progress Dashboard", WIDTH)?;
    writeln!(w)?;
    writeln!(
        w,
        "{} {}",
        painter.bold("Overall Progress:"),
        painter.green(format!("{}%", dash.percent()))
    )?;
    writeln!(w, "{}", progress_bar(painter, dash.percent(), 50))?;
    writeln!(w)?;
    writeln!(w, "{} Completed: {}/{} tasks", painter.green("✅"), dash.completed, dash.total)?;
    writeln!(w, "{} In Progress: {} tasks", painter.yellow("🔄"), dash.in_progress)?;
    writeln!(w, "{} Remaining: {} tasks", painter.blue("⏳"), dash.remaining())?;
    writeln!(w)?;

    writeln!(w, "{}", painter.bold("Stage Breakdown:"))?;
    writeln!(w)?;
    for stage in &dash.stages {
        writeln!(
            w,
            "Stage {}: {} {}% ({}/{})",
            stage.stage,
            progress_bar(painter, stage.percent(), 30),
            stage.percent(),
            stage.completed,
            stage.total
        )?;
    }
    writeln!(w)?;

    let started = dash.start_date.with_timezone(&offset);
    writeln!(w, "{} Started: {}", painter.cyan("📅"), started.format("%Y-%m-%d"))?;
    writeln!(
        w,
        "{}  Total Study Time: {} hours",
        painter.magenta("⏱️"),
        minutes_to_hours(dash.total_study_minutes)
    )?;
    match dash.days_since_study {
        Some(days) if days <= 0 => {
            writeln!(w, "{}", painter.green("🔥 Studying today! Keep it up!"))?
        }
        Some(1) => writeln!(w, "{}", painter.yellow("📚 Last studied yesterday"))?,
        Some(days) => writeln!(w, "{}", painter.red(format!("⏰ Last studied {days} days ago")))?,
        None => {}
    }
    writeln!(w)
}

pub fn study_stats(w: &mut impl Write, painter: Painter, stats: &StudyStats) -> io::Result<()> {
    heading(w, painter, "📈 Learning Statistics", WIDTH)?;
    writeln!(w)?;
    writeln!(w, "{} Study Days: {}", painter.cyan("📅"), painter.bold(stats.study_days))?;
    writeln!(
        w,
        "{} Average Daily: {}",
        painter.blue("📊"),
        painter.bold(format!("{} hours", stats.average_daily_hours))
    )?;
    writeln!(w)?;

    writeln!(w, "{}", painter.bold("Last 7 Days:"))?;
    writeln!(w)?;
    for day in &stats.last_week {
        writeln!(
            w,
            "  {}: {} {}h",
            day.date.format("%a %b %-d"),
            cells(painter, day.bar_len(), DayActivity::BAR_WIDTH),
            day.hours()
        )?;
    }
    writeln!(w)?;

    let pace = stats
        .days_at_current_pace
        .map_or_else(|| "∞".to_string(), |days| days.to_string());
    writeln!(w, "{}", painter.bold("🎯 Completion Projection:"))?;
    writeln!(w, "  Remaining Tasks: {}", painter.yellow(stats.remaining_tasks))?;
    writeln!(
        w,
        "  Estimated Hours: {}",
        painter.yellow((stats.remaining_minutes as f64 / 60.0).round())
    )?;
    writeln!(w, "  At Current Pace: {}", painter.cyan(format!("{pace} days")))?;
    writeln!(w)?;

    if stats.streak > 0 {
        let plural = if stats.streak > 1 { "s" } else { "" };
        writeln!(
            w,
            "{}",
            painter.magenta(format!("🔥 Current Streak: {} day{plural}!", stats.streak))
        )?;
        writeln!(w)?;
    }
    Ok(())
}

fn status_icon(painter: Painter, status: CheckStatus) -> String {
    match status {
        CheckStatus::Pass => painter.green("✅"),
        CheckStatus::Warning => painter.yellow("⚠️"),
        CheckStatus::Fail => painter.red("❌"),
    }
}

fn check_lines(
    w: &mut impl Write,
    painter: Painter,
    check: &CheckResult,
    show_message: bool,
) -> io::Result<()> {
    writeln!(w, "{} {}", status_icon(painter, check.status), check.name)?;
    if show_message {
        writeln!(w, "   {}", check.message)?;
    }
    Ok(())
}

/// `check [--verbose]`. Messages of passing checks only show with `verbose`.
pub fn health_report(
    w: &mut impl Write,
    painter: Painter,
    report: &HealthReport,
    verbose: bool,
) -> io::Result<()> {
    heading(w, painter, "🔍 Health Check", WIDTH)?;
    writeln!(w)?;
    for check in &report.checks {
        check_lines(w, painter, check, verbose || !check.is_pass())?;
        writeln!(w)?;
    }

    let tally = report.tally();
    writeln!(w, "{}", rule(WIDTH))?;
    writeln!(w)?;
    writeln!(w, "{}", painter.bold("Summary:"))?;
    writeln!(w, "  {} Pass: {}", painter.green("✅"), tally.pass)?;
    writeln!(w, "  {} Warning: {}", painter.yellow("⚠️"), tally.warning)?;
    writeln!(w, "  {} Fail: {}", painter.red("❌"), tally.fail)?;
    writeln!(w)?;

    match tally.verdict() {
        Verdict::Ready => writeln!(
            w,
            "{}",
            painter.green("🎉 All checks passed! Your learning plan is ready.")
        )?,
        Verdict::Functional => writeln!(
            w,
            "{}",
            painter.yellow("⚠️  Plan is functional but has warnings. Review above.")
        )?,
        Verdict::Critical => {
            writeln!(w, "{}", painter.red("❌ Critical issues found. Run `fix` to auto-repair:"))?;
            writeln!(w, "{}", painter.cyan("   studyplan fix"))?;
        }
    }
    writeln!(w)
}

pub fn diagnosis(w: &mut impl Write, painter: Painter, diag: &Diagnosis) -> io::Result<()> {
    heading(w, painter, "🔬 Deep Diagnostics", WIDTH)?;
    writeln!(w)?;

    writeln!(w, "{}", painter.cyan("📊 Task Distribution:"))?;
    for (stage, count) in &diag.distribution {
        writeln!(w, "  Stage {stage}: {count} tasks")?;
    }
    writeln!(w)?;

    writeln!(w, "{}", painter.cyan("🔗 Dependency Analysis:"))?;
    match diag.max_depth {
        Some(depth) => writeln!(w, "  Maximum dependency depth: {depth}")?,
        None => writeln!(w, "  Maximum dependency depth: unavailable (circular dependencies)")?,
    }
    writeln!(w)?;

    if let Some(progress) = &diag.progress {
        writeln!(w, "{}", painter.cyan("📈 Progress Statistics:"))?;
        writeln!(
            w,
            "  Total study time: {} hours",
            minutes_to_hours(progress.total_study_minutes)
        )?;
        writeln!(w, "  Study days: {}", progress.study_days)?;
        writeln!(w, "  Completed tasks: {}", progress.completed)?;
        writeln!(w, "  In-progress tasks: {}", progress.in_progress)?;
        writeln!(w)?;
    }

    writeln!(w, "{}", painter.cyan("⏱️  Duration Analysis:"))?;
    writeln!(w, "  Total estimated time: {} hours", round1(diag.total_estimated_hours))?;
    writeln!(w, "  Average task duration: {} hours", round1(diag.average_estimated_hours))?;
    writeln!(w)?;

    writeln!(w, "{}", painter.bold("💡 Recommendations:"))?;
    writeln!(w)?;
    if diag.findings.is_empty() {
        writeln!(w, "{}", painter.green("  ✅ No issues detected"))?;
    }
    for finding in &diag.findings {
        let icon = if finding.is_error() {
            painter.red("❌")
        } else {
            painter.yellow("⚠️")
        };
        match finding {
            Finding::LongTasks { .. } => writeln!(
                w,
                "  {icon}  Consider breaking down tasks - average duration is high"
            )?,
            Finding::DeepChains { depth } => writeln!(
                w,
                "  {icon}  Long dependency chains may slow progress (depth {depth})"
            )?,
            Finding::StuckTasks { days, tasks } => {
                writeln!(w, "  {icon} {} task(s) in progress for over {days} days", tasks.len())?;
                writeln!(w, "     Tasks: {}", tasks.join(", "))?;
            }
            Finding::CyclicGraph => writeln!(
                w,
                "  {icon} Circular dependencies found - run `studyplan verify deps`"
            )?,
            Finding::UnreadableProgress(message) => {
                writeln!(w, "  {icon} progress.json could not be read")?;
                writeln!(w, "     {message}")?;
            }
        }
    }
    writeln!(w)
}

pub fn verification(
    w: &mut impl Write,
    painter: Painter,
    verification: &Verification,
) -> io::Result<()> {
    match verification {
        Verification::Dependencies(checks) => {
            heading(w, painter, "✓ Dependency Verification", WIDTH)?;
            writeln!(w)?;
            for check in checks {
                writeln!(w, "{} {}", status_icon(painter, check.status), check.message)?;
            }
        }
        Verification::Task(task) => {
            heading(w, painter, &format!("✓ Task Verification: {}", task.key), WIDTH)?;
            writeln!(w)?;
            let def = &task.definition;
            let or_unknown = |v: Option<u32>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
            writeln!(w, "Name: {}", def.name)?;
            writeln!(w, "Stage: {}", def.stage)?;
            writeln!(w, "Week: {}, Day: {}", or_unknown(def.week), or_unknown(def.day))?;
            writeln!(w, "Duration: {}", def.duration)?;
            let deps = if def.deps.is_empty() {
                "none".to_string()
            } else {
                def.deps.join(", ")
            };
            writeln!(w, "Dependencies: {deps}")?;

            if !task.dependencies.is_empty() {
                writeln!(w)?;
                writeln!(w, "{}", painter.cyan("Dependency Status:"))?;
                for dep in &task.dependencies {
                    let name = dep.name.as_deref().unwrap_or_default();
                    match dep.status {
                        DependencyStatus::NotFound => {
                            writeln!(w, "  {} {}: Not found", painter.red("❌"), dep.key)?
                        }
                        DependencyStatus::Completed => writeln!(
                            w,
                            "  {} {}: {name} (completed)",
                            painter.green("✅"),
                            dep.key
                        )?,
                        DependencyStatus::InProgress => writeln!(
                            w,
                            "  {} {}: {name} (in progress)",
                            painter.yellow("🔄"),
                            dep.key
                        )?,
                        DependencyStatus::Pending => writeln!(
                            w,
                            "  {} {}: {name} (pending)",
                            painter.blue("⏳"),
                            dep.key
                        )?,
                    }
                }
            }
            if !task.unlocks.is_empty() {
                writeln!(w)?;
                writeln!(w, "Unlocks: {}", task.unlocks.join(", "))?;
            }
        }
        Verification::General {
            unknown_target,
            checks,
        } => {
            if let Some(target) = unknown_target {
                writeln!(
                    w,
                    "{}",
                    painter.yellow(format!(
                        "No task named \"{target}\"; running the general checks instead"
                    ))
                )?;
            }
            heading(w, painter, "✓ Configuration Verification", WIDTH)?;
            writeln!(w)?;
            for check in checks {
                check_lines(w, painter, check, true)?;
            }
        }
    }
    writeln!(w)
}

pub fn repair_report(
    w: &mut impl Write,
    painter: Painter,
    report: &RepairReport,
) -> io::Result<()> {
    heading(w, painter, "🔧 Auto-Fix Issues", WIDTH)?;
    writeln!(w)?;
    if report.dry_run {
        writeln!(w, "{}", painter.yellow("🔍 DRY RUN - No changes will be made"))?;
        writeln!(w)?;
    }

    if report.is_clean() {
        writeln!(w, "{}", painter.green("✅ No issues to fix"))?;
    } else if !report.repairs.is_empty() {
        writeln!(w, "{}", painter.cyan(format!("Found {} issue(s):", report.repairs.len())))?;
        writeln!(w)?;
        for (index, repair) in report.repairs.iter().enumerate() {
            repair_lines(w, painter, index + 1, repair)?;
        }
        if report.dry_run {
            writeln!(w, "{}", painter.cyan("Run without --dry-run to apply fixes"))?;
        } else {
            writeln!(w, "{}", painter.green("✅ All issues fixed"))?;
        }
    }

    for problem in &report.unrepairable {
        writeln!(w)?;
        writeln!(w, "{} {problem}", painter.red("❌"))?;
    }
    writeln!(w)
}

fn repair_lines(
    w: &mut impl Write,
    painter: Painter,
    number: usize,
    repair: &Repair,
) -> io::Result<()> {
    writeln!(w, "{number}. {}", painter.yellow(repair.issue()))?;
    writeln!(w, "   Action: {}", repair.action())?;
    writeln!(w)
}

pub fn scaffold_report(
    w: &mut impl Write,
    painter: Painter,
    report: &ScaffoldReport,
) -> io::Result<()> {
    heading(w, painter, "🚀 Learning Plan Creator", WIDTH)?;
    writeln!(w)?;
    for entry in &report.entries {
        let line = match entry.action {
            ScaffoldAction::Created => format!("Created {}", entry.path),
            ScaffoldAction::CreatedDefault => format!("Created {} (default)", entry.path),
            ScaffoldAction::Exists => format!("{} exists", entry.path),
        };
        writeln!(w, "{} {line}", painter.green("✅"))?;
    }
    writeln!(w)?;
    writeln!(w, "{}", painter.cyan("📋 Next steps:"))?;
    writeln!(w, "  1. Edit data/config.json to define your tasks")?;
    writeln!(w, "  2. Review learning-plan.md for your plan overview")?;
    writeln!(w, "  3. Run: studyplan check")?;
    writeln!(w, "  4. Start learning: ./scripts/launch.sh or studyplan list")?;
    writeln!(w)?;
    writeln!(w, "{}", painter.yellow("📚 Documentation files:"))?;
    writeln!(w, "  - learning-plan.md: Main plan overview")?;
    writeln!(w, "  - progress.md: Track your daily progress")?;
    writeln!(w, "  - notes.md: Study notes and references")?;
    writeln!(w, "  - questions.md: Q&A tracking")?;
    writeln!(w)
}

pub mod builders;

use std::sync::Once;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use studyplan::clock::FixedClock;
use studyplan::config::Settings;
use studyplan::engine::Workspace;
use studyplan::fs::mock::MockFileSystem;
use studyplan::plan::PlanPaths;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Root used by every mock workspace.
pub const PLAN_ROOT: &str = "/plan";

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// A UTC instant at minute precision.
pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    at_offset(y, m, d, h, min, 0)
}

/// A local instant `offset_hours` east of UTC.
pub fn at_offset(
    y: i32,
    m: u32,
    d: u32,
    h: u32,
    min: u32,
    offset_hours: i32,
) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(offset_hours * 3600).expect("valid offset");
    offset
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous local time")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A workspace rooted at [`PLAN_ROOT`] on `fs`, frozen at `now`.
///
/// `MockFileSystem` clones share their contents, so the caller can keep
/// inspecting `fs` after handing it over.
pub fn mock_workspace(fs: &MockFileSystem, now: DateTime<FixedOffset>) -> Workspace {
    mock_workspace_with(fs, now, Settings::default())
}

pub fn mock_workspace_with(
    fs: &MockFileSystem,
    now: DateTime<FixedOffset>,
    settings: Settings,
) -> Workspace {
    Workspace::new(
        PlanPaths::new(PLAN_ROOT),
        Box::new(fs.clone()),
        Box::new(FixedClock(now)),
        settings,
    )
}

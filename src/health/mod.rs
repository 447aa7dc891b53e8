// src/health/mod.rs

//! Read-only reports over a plan: health checks, diagnostics, verification
//! and statistics. Nothing here writes, and nothing here fails because of
//! what it finds.

pub mod checks;
pub mod diagnose;
pub mod stats;
pub mod verify;

pub use checks::{health_check, CheckResult, CheckStatus, CheckTally, HealthReport, Verdict};
pub use diagnose::{diagnose, Diagnosis, Finding, ProgressSummary};
pub use stats::{dashboard, study_stats, Dashboard, DayActivity, StageProgress, StudyStats};
pub use verify::{verify, DependencyReport, DependencyStatus, TaskVerification, Verification};

// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{self, Settings};
use crate::dag::{DependencyGraph, Readiness};
use crate::errors::{PlanError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::definition::{PlanDefinition, TaskTable};
use crate::plan::progress::ProgressDocument;
use crate::plan::store::{self, JsonProgressStore, PlanPaths, ProgressStore};

use super::lifecycle;
use super::repair::{self, Repair, RepairReport};
use super::{CompleteOutcome, StartOutcome};

/// Both plan documents as loaded for one command.
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    pub definitions: PlanDefinition,
    pub progress: ProgressDocument,
    /// `false` while the progress document only exists in memory.
    pub progress_on_disk: bool,
}

impl PlanSnapshot {
    pub fn tasks(&self) -> &TaskTable {
        &self.definitions.tasks
    }

    pub fn readiness(&self) -> Readiness<'_> {
        Readiness::new(&self.definitions.tasks, &self.progress)
    }
}

/// How the progress document looked when it was read.
#[derive(Debug, Clone)]
pub enum ProgressLoad {
    Missing,
    /// Present but not parseable; holds the parse error.
    Malformed(String),
    Loaded(ProgressDocument),
}

/// A plan directory plus everything needed to act on it.
///
/// This is the only place where documents are read and written; the
/// transitions it runs are pure functions from [`lifecycle`] and [`repair`].
pub struct Workspace {
    paths: PlanPaths,
    fs: Box<dyn FileSystem>,
    clock: Box<dyn Clock>,
    settings: Settings,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("paths", &self.paths)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    pub fn new(
        paths: PlanPaths,
        fs: Box<dyn FileSystem>,
        clock: Box<dyn Clock>,
        settings: Settings,
    ) -> Self {
        Self {
            paths,
            fs,
            clock,
            settings,
        }
    }

    /// Open a plan directory on the real filesystem.
    ///
    /// `settings_path` defaults to `<root>/studyplan.toml`.
    pub fn open(root: impl Into<PathBuf>, settings_path: Option<PathBuf>) -> Result<Self> {
        let paths = PlanPaths::new(root);
        let fs = RealFileSystem;
        let settings_path =
            settings_path.unwrap_or_else(|| config::default_settings_path(paths.root()));
        let settings = config::load_and_validate(&fs, &settings_path)?;
        debug!(root = %paths.root().display(), "opened plan directory");
        Ok(Self::new(paths, Box::new(fs), Box::new(SystemClock), settings))
    }

    pub fn paths(&self) -> &PlanPaths {
        &self.paths
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Local calendar day, re-read from the clock on every call.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// `now` as stored in documents: UTC, millisecond precision.
    pub fn now_utc(&self) -> DateTime<Utc> {
        lifecycle::timestamp(self.now())
    }

    pub fn progress_store(&self) -> JsonProgressStore<'_> {
        JsonProgressStore::new(self.fs.as_ref(), self.paths.progress())
    }

    pub fn load_definitions(&self) -> Result<PlanDefinition> {
        store::load_definitions(self.fs.as_ref(), &self.paths.definitions())
    }

    /// Like [`Workspace::load_definitions`], but a document that does not
    /// parse yields `None` so diagnostics can report it.
    pub fn load_definitions_lenient(&self) -> Result<Option<PlanDefinition>> {
        match self.load_definitions() {
            Ok(plan) => Ok(Some(plan)),
            Err(err @ PlanError::MalformedJson { .. }) => {
                warn!(error = %err, "definitions document does not parse");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Load the progress document without failing on bad JSON.
    pub fn load_progress_checked(&self) -> Result<ProgressLoad> {
        match self.progress_store().load() {
            Ok(Some(doc)) => Ok(ProgressLoad::Loaded(doc)),
            Ok(None) => Ok(ProgressLoad::Missing),
            Err(err @ PlanError::MalformedJson { .. }) => {
                warn!(error = %err, "progress document does not parse");
                Ok(ProgressLoad::Malformed(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// The progress document, or a fresh one when it does not exist or does
    /// not parse. Never writes.
    pub fn load_progress_lenient(&self) -> Result<ProgressDocument> {
        Ok(match self.load_progress_checked()? {
            ProgressLoad::Loaded(doc) => doc,
            ProgressLoad::Missing | ProgressLoad::Malformed(_) => {
                ProgressDocument::new(self.now_utc())
            }
        })
    }

    /// Load both documents. A missing progress document becomes an
    /// in-memory default; nothing is written.
    pub fn snapshot(&self) -> Result<PlanSnapshot> {
        let definitions = self.load_definitions()?;
        let store = self.progress_store();
        let (progress, progress_on_disk) = match store.load()? {
            Some(doc) => (doc, true),
            None => (ProgressDocument::new(self.now_utc()), false),
        };
        Ok(PlanSnapshot {
            definitions,
            progress,
            progress_on_disk,
        })
    }

    /// Start `key` and persist. On any error nothing is written and
    /// `snapshot` is unchanged.
    pub fn start(&self, snapshot: &mut PlanSnapshot, key: &str) -> Result<StartOutcome> {
        let mut progress = snapshot.progress.clone();
        let outcome = lifecycle::start(&mut progress, snapshot.tasks(), key, self.now())?;
        self.commit(snapshot, progress)?;
        Ok(outcome)
    }

    /// Complete `key` and persist. On any error nothing is written and
    /// `snapshot` is unchanged.
    pub fn complete(&self, snapshot: &mut PlanSnapshot, key: &str) -> Result<CompleteOutcome> {
        let mut progress = snapshot.progress.clone();
        let outcome = lifecycle::complete(&mut progress, snapshot.tasks(), key, self.now())?;
        self.commit(snapshot, progress)?;
        Ok(outcome)
    }

    fn commit(&self, snapshot: &mut PlanSnapshot, progress: ProgressDocument) -> Result<()> {
        self.progress_store().save(&progress)?;
        snapshot.progress = progress;
        snapshot.progress_on_disk = true;
        Ok(())
    }

    /// Run the repair pass.
    ///
    /// Missing or circular dependencies are reported as unrepairable. `tasks`
    /// is `None` when the definitions document does not parse; orphan cleanup
    /// is skipped then, since every entry would look orphaned.
    pub fn repair(&self, tasks: Option<&TaskTable>, dry_run: bool) -> Result<RepairReport> {
        let mut report = RepairReport {
            dry_run,
            ..RepairReport::default()
        };

        let data_dir = self.paths.data_dir();
        if !self.fs.is_dir(&data_dir) {
            if !dry_run {
                self.fs.create_dir_all(&data_dir)?;
            }
            report.repairs.push(Repair::CreateDataDir(data_dir));
        }

        let store = self.progress_store();
        if !store.exists() {
            if !dry_run {
                store.save(&ProgressDocument::new(self.now_utc()))?;
            }
            report
                .repairs
                .push(Repair::CreateProgressDocument(store.path().to_path_buf()));
        }

        match tasks {
            None => report.unrepairable.push(
                "config.json does not parse; orphaned progress entries were not checked"
                    .to_string(),
            ),
            Some(tasks) => {
                if let Err(err) = DependencyGraph::new(tasks).validate() {
                    report
                        .unrepairable
                        .push(format!("{err}; edit config.json by hand"));
                }
                if store.exists() {
                    self.remove_orphaned_entries(tasks, dry_run, &mut report)?;
                }
            }
        }

        info!(
            dry_run,
            repairs = report.repairs.len(),
            unrepairable = report.unrepairable.len(),
            "repair pass finished"
        );
        Ok(report)
    }

    fn remove_orphaned_entries(
        &self,
        tasks: &TaskTable,
        dry_run: bool,
        report: &mut RepairReport,
    ) -> Result<()> {
        let store = self.progress_store();
        match store.load() {
            Ok(Some(mut doc)) => {
                let orphans = doc.orphaned_keys(tasks);
                if !orphans.is_empty() {
                    if !dry_run {
                        repair::remove_orphans(&mut doc, tasks);
                        store.save(&doc)?;
                    }
                    report.repairs.push(Repair::RemoveOrphans(orphans));
                }
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err @ PlanError::MalformedJson { .. }) => {
                report
                    .unrepairable
                    .push(format!("{err}; edit the file by hand or remove it"));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

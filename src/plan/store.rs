// src/plan/store.rs

//! JSON persistence for the two plan documents.
//!
//! Both documents are read in full and written in full. There is no temp
//! file and no lock: two concurrent invocations against the same plan
//! directory race, and the last writer wins.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::{PlanError, Result};
use crate::fs::FileSystem;
use crate::plan::definition::PlanDefinition;
use crate::plan::progress::ProgressDocument;

/// Fixed layout of a plan directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanPaths {
    root: PathBuf,
}

impl PlanPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    /// `<root>/data/config.json`
    pub fn definitions(&self) -> PathBuf {
        self.data_dir().join("config.json")
    }

    /// `<root>/data/progress.json`
    pub fn progress(&self) -> PathBuf {
        self.data_dir().join("progress.json")
    }
}

/// Load the definitions document.
///
/// - missing file → [`PlanError::ConfigNotFound`]
/// - unparsable JSON → [`PlanError::MalformedJson`]
pub fn load_definitions(fs: &dyn FileSystem, path: &Path) -> Result<PlanDefinition> {
    if !fs.is_file(path) {
        return Err(PlanError::ConfigNotFound(path.to_path_buf()));
    }
    let text = fs.read_to_string(path)?;
    let plan = parse_json(path, &text)?;
    debug!(path = %path.display(), "loaded plan definitions");
    Ok(plan)
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| PlanError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Where progress documents are loaded from and saved to.
pub trait ProgressStore: Debug {
    fn exists(&self) -> bool;

    /// `Ok(None)` when no document has been written yet.
    fn load(&self) -> Result<Option<ProgressDocument>>;

    fn save(&self, doc: &ProgressDocument) -> Result<()>;

    /// Load, or start a fresh in-memory document. Never writes.
    fn load_or_default(&self, now: DateTime<Utc>) -> Result<ProgressDocument> {
        Ok(self.load()?.unwrap_or_else(|| ProgressDocument::new(now)))
    }
}

/// Progress document stored as pretty-printed JSON on a [`FileSystem`].
#[derive(Debug)]
pub struct JsonProgressStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> JsonProgressStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore<'_> {
    fn exists(&self) -> bool {
        self.fs.is_file(&self.path)
    }

    fn load(&self) -> Result<Option<ProgressDocument>> {
        if !self.exists() {
            debug!(path = %self.path.display(), "no progress document yet");
            return Ok(None);
        }
        let text = self.fs.read_to_string(&self.path)?;
        let doc = parse_json(&self.path, &text)?;
        debug!(path = %self.path.display(), "loaded progress document");
        Ok(Some(doc))
    }

    fn save(&self, doc: &ProgressDocument) -> Result<()> {
        let mut text = serde_json::to_string_pretty(doc).map_err(anyhow::Error::from)?;
        text.push('\n');
        self.fs.write(&self.path, text.as_bytes())?;
        debug!(
            path = %self.path.display(),
            tasks = doc.tasks.len(),
            "saved progress document"
        );
        Ok(())
    }
}

// src/errors.rs

//! Crate-wide error type and result alias.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A dependency that keeps a task from starting.
///
/// `name` is `None` when the dependency key has no definition at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockingDependency {
    pub key: String,
    pub name: Option<String>,
}

impl fmt::Display for BlockingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}: {}", self.key, name),
            None => write!(f, "{}: Unknown", self.key),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("No learning plan found: {} does not exist", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Task {0} not found")]
    TaskNotFound(String),

    #[error("Prerequisites not met for task {task}: {}", join_blocking(.blocking))]
    PrerequisitesNotMet {
        task: String,
        blocking: Vec<BlockingDependency>,
    },

    #[error("Task {0} is already completed")]
    AlreadyCompleted(String),

    #[error("Malformed JSON in {}: {source}", .path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dependency structure error: {0}")]
    StructuralDependency(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlanError {
    /// Lifecycle refusals are reported to the user rather than treated as
    /// crashes; nothing has been written when one of these is returned.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            PlanError::TaskNotFound(_)
                | PlanError::PrerequisitesNotMet { .. }
                | PlanError::AlreadyCompleted(_)
        )
    }
}

fn join_blocking(blocking: &[BlockingDependency]) -> String {
    blocking
        .iter()
        .map(|b| b.key.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PlanError>;

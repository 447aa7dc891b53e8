// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::ColorChoice;

/// Top-level settings file as read from TOML, before validation.
///
/// ```toml
/// [settings]
/// stuck_after_days = 7
/// assumed_task_minutes = 120
/// next_count = 3
/// color = "auto"
/// template_dir = "templates"
/// ```
///
/// The whole file and every key are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettingsFile {
    #[serde(default)]
    pub settings: SettingsSection,
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsSection {
    /// An in-progress task older than this many days is reported as stuck.
    #[serde(default = "default_stuck_after_days")]
    pub stuck_after_days: u32,

    /// Estimated minutes per remaining task, used for the completion projection.
    #[serde(default = "default_assumed_task_minutes")]
    pub assumed_task_minutes: u32,

    /// How many recommended tasks `next` (and `complete`) show.
    #[serde(default = "default_next_count")]
    pub next_count: usize,

    /// Average estimated task length (hours) above which diagnostics suggest
    /// splitting tasks.
    #[serde(default = "default_long_task_hours")]
    pub long_task_hours: f64,

    /// Maximum dependency depth above which diagnostics warn about long chains.
    #[serde(default = "default_deep_chain_depth")]
    pub deep_chain_depth: usize,

    #[serde(default)]
    pub color: ColorChoice,

    /// Directory holding `learning-plan.md`, `progress.md`, ... templates for
    /// `init`. Relative paths are resolved against the plan directory.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

fn default_stuck_after_days() -> u32 {
    7
}

fn default_assumed_task_minutes() -> u32 {
    120
}

fn default_next_count() -> usize {
    3
}

fn default_long_task_hours() -> f64 {
    3.0
}

fn default_deep_chain_depth() -> usize {
    5
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            stuck_after_days: default_stuck_after_days(),
            assumed_task_minutes: default_assumed_task_minutes(),
            next_count: default_next_count(),
            long_task_hours: default_long_task_hours(),
            deep_chain_depth: default_deep_chain_depth(),
            color: ColorChoice::default(),
            template_dir: None,
        }
    }
}

/// Validated settings. Only obtainable through `TryFrom<RawSettingsFile>`
/// or [`Settings::default`].
#[derive(Debug, Clone)]
pub struct Settings {
    section: SettingsSection,
}

impl Settings {
    pub(crate) fn new_unchecked(section: SettingsSection) -> Self {
        Self { section }
    }

    pub fn stuck_after_days(&self) -> u32 {
        self.section.stuck_after_days
    }

    pub fn assumed_task_minutes(&self) -> u32 {
        self.section.assumed_task_minutes
    }

    pub fn next_count(&self) -> usize {
        self.section.next_count
    }

    pub fn long_task_hours(&self) -> f64 {
        self.section.long_task_hours
    }

    pub fn deep_chain_depth(&self) -> usize {
        self.section.deep_chain_depth
    }

    pub fn color(&self) -> ColorChoice {
        self.section.color
    }

    pub fn template_dir(&self) -> Option<&PathBuf> {
        self.section.template_dir.as_ref()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new_unchecked(SettingsSection::default())
    }
}

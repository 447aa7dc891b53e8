// src/scaffold/mod.rs

//! `init`: lay out a new plan directory.
//!
//! Existing files are never overwritten, so running `init` inside an
//! existing plan only fills in what is missing.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::engine::Workspace;
use crate::errors::Result;
use crate::plan::definition::PlanDefinition;
use crate::plan::progress::ProgressDocument;
use crate::plan::store::ProgressStore;

/// A document generated from a template, relative to the plan root.
#[derive(Debug, Clone, Copy)]
struct TemplateFile {
    path: &'static str,
    builtin: &'static str,
    executable: bool,
}

const TEMPLATE_FILES: &[TemplateFile] = &[
    TemplateFile {
        path: "learning-plan.md",
        builtin: include_str!("templates/learning-plan.md"),
        executable: false,
    },
    TemplateFile {
        path: "progress.md",
        builtin: include_str!("templates/progress.md"),
        executable: false,
    },
    TemplateFile {
        path: "notes.md",
        builtin: include_str!("templates/notes.md"),
        executable: false,
    },
    TemplateFile {
        path: "questions.md",
        builtin: include_str!("templates/questions.md"),
        executable: false,
    },
    TemplateFile {
        path: "scripts/launch.sh",
        builtin: include_str!("templates/launch.sh"),
        executable: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldAction {
    Created,
    /// Created from the built-in template because the template directory had
    /// no such file.
    CreatedDefault,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldEntry {
    /// Relative to the plan root; directories end with `/`.
    pub path: String,
    pub action: ScaffoldAction,
}

#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub entries: Vec<ScaffoldEntry>,
}

impl ScaffoldReport {
    fn record(&mut self, path: impl Into<String>, action: ScaffoldAction) {
        let path = path.into();
        debug!(path = %path, ?action, "scaffold entry");
        self.entries.push(ScaffoldEntry { path, action });
    }

    pub fn created(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.action != ScaffoldAction::Exists)
            .count()
    }
}

/// Values substituted into `{{name}}`-style placeholders.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub level: String,
    pub created: String,
    pub date: String,
}

impl TemplateVars {
    /// Plan fields fall back to the starter plan's values.
    pub fn new(plan: &PlanDefinition, today: NaiveDate) -> Self {
        let starter = PlanDefinition::template(today);
        let pick = |value: &Option<String>, fallback: &Option<String>| {
            value
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| fallback.clone())
                .unwrap_or_default()
        };
        Self {
            name: pick(&plan.name, &starter.name),
            description: pick(&plan.description, &starter.description),
            duration: pick(&plan.duration, &starter.duration),
            level: pick(&plan.level, &starter.level),
            created: pick(&plan.created, &starter.created),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn render(&self, template: &str) -> String {
        [
            ("{{name}}", &self.name),
            ("{{description}}", &self.description),
            ("{{duration}}", &self.duration),
            ("{{level}}", &self.level),
            ("{{created}}", &self.created),
            ("{{date}}", &self.date),
        ]
        .into_iter()
        .fold(template.to_string(), |text, (placeholder, value)| {
            text.replace(placeholder, value)
        })
    }
}

/// Create whatever is missing from a plan directory.
pub fn init(ws: &Workspace) -> Result<ScaffoldReport> {
    let fs = ws.fs();
    let paths = ws.paths();
    let today = ws.today();
    let mut report = ScaffoldReport::default();

    for (dir, label) in [(paths.data_dir(), "data/"), (paths.scripts_dir(), "scripts/")] {
        if fs.is_dir(&dir) {
            report.record(label, ScaffoldAction::Exists);
        } else {
            fs.create_dir_all(&dir)?;
            report.record(label, ScaffoldAction::Created);
        }
    }

    let store = ws.progress_store();
    if store.exists() {
        report.record("data/progress.json", ScaffoldAction::Exists);
    } else {
        store.save(&ProgressDocument::new(ws.now_utc()))?;
        report.record("data/progress.json", ScaffoldAction::Created);
    }

    let definitions_path = paths.definitions();
    let plan = if fs.is_file(&definitions_path) {
        report.record("data/config.json", ScaffoldAction::Exists);
        // A broken config.json still gets its neighbours; `check` reports it.
        ws.load_definitions_lenient()?.unwrap_or_default()
    } else {
        let plan = PlanDefinition::template(today);
        let mut text = serde_json::to_string_pretty(&plan).map_err(anyhow::Error::from)?;
        text.push('\n');
        fs.write(&definitions_path, text.as_bytes())?;
        report.record("data/config.json", ScaffoldAction::Created);
        plan
    };

    let vars = TemplateVars::new(&plan, today);
    let template_dir = ws
        .settings()
        .template_dir()
        .map(|dir| resolve(paths.root(), dir));

    for file in TEMPLATE_FILES {
        let target = paths.root().join(file.path);
        if fs.exists(&target) {
            report.record(file.path, ScaffoldAction::Exists);
            continue;
        }

        let custom = template_dir
            .as_ref()
            .map(|dir| dir.join(file_name(file.path)))
            .filter(|source| fs.is_file(source));
        let (template, action) = match custom {
            Some(source) => (fs.read_to_string(&source)?, ScaffoldAction::Created),
            None => (file.builtin.to_string(), ScaffoldAction::CreatedDefault),
        };

        fs.write(&target, vars.render(&template).as_bytes())?;
        if file.executable {
            fs.set_executable(&target)?;
        }
        report.record(file.path, action);
    }

    info!(created = report.created(), "plan directory initialised");
    Ok(report)
}

fn resolve(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

fn file_name(relative: &str) -> &str {
    relative.rsplit('/').next().unwrap_or(relative)
}

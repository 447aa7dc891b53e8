// src/plan/definition.rs

//! Static plan metadata: the definitions document (`data/config.json`).

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::TaskKey;

/// Top-level definitions document.
///
/// ```json
/// {
///   "name": "Rust in 4 weeks",
///   "duration": "4 weeks",
///   "tasks": {
///     "1.1": { "name": "Install toolchain", "stage": 1, "week": 1, "day": 1,
///              "duration": "2h", "deps": [] }
///   }
/// }
/// ```
///
/// Everything is optional at the serde level; [`crate::health`] reports what
/// is missing instead of refusing to load the plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form plan length, e.g. `"4 weeks"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub tasks: TaskTable,
}

impl PlanDefinition {
    /// The starter plan written by `init`.
    pub fn template(created: NaiveDate) -> Self {
        let mut tasks = TaskTable::new();
        tasks.insert(
            "1.1".to_string(),
            TaskDefinition {
                name: "First task - define your goal".to_string(),
                stage: 1,
                week: Some(1),
                day: Some(1),
                duration: "2h".to_string(),
                deps: Vec::new(),
            },
        );

        Self {
            name: Some("My Learning Plan".to_string()),
            description: Some("Description of what you want to learn".to_string()),
            duration: Some("4 weeks".to_string()),
            level: Some("beginner".to_string()),
            created: Some(created.format("%Y-%m-%d").to_string()),
            tasks,
        }
    }

    /// Plan name, treating an empty string as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    pub fn display_duration(&self) -> Option<&str> {
        self.duration.as_deref().filter(|s| !s.is_empty())
    }
}

/// Metadata of a single task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(default)]
    pub name: String,
    /// Coarse grouping (1-based). `0` means the field was missing.
    #[serde(default)]
    pub stage: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Estimated effort, `<number>[h|m]`.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub deps: Vec<TaskKey>,
}

impl TaskDefinition {
    /// A task needs a name, a stage, a week and a duration.
    pub fn is_well_formed(&self) -> bool {
        !self.name.is_empty() && self.stage >= 1 && self.week.is_some() && !self.duration.is_empty()
    }

    pub fn estimated_hours(&self) -> f64 {
        parse_duration_hours(&self.duration)
    }
}

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(h|m)?").expect("duration regex is valid")
});

/// Parse a task duration such as `"2h"`, `"90m"`, `"1.5 H"` or `"3"` into
/// hours. The unit defaults to hours; text without a number counts as zero.
pub fn parse_duration_hours(s: &str) -> f64 {
    let Some(caps) = DURATION_RE.captures(s) else {
        return 0.0;
    };
    let value: f64 = caps[1].parse().unwrap_or(0.0);
    match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(unit) if unit == "m" => value / 60.0,
        _ => value,
    }
}

/// Task definitions keyed by task key, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTable {
    entries: Vec<(TaskKey, TaskDefinition)>,
    index: HashMap<TaskKey, usize>,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a definition. A replaced key keeps its original
    /// position.
    pub fn insert(&mut self, key: TaskKey, def: TaskDefinition) {
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = def,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, def));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TaskDefinition> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskDefinition)> {
        self.entries.iter().map(|(k, d)| (k.as_str(), d))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Distinct stages, ascending.
    pub fn stages(&self) -> Vec<u32> {
        let mut stages: Vec<u32> = self.entries.iter().map(|(_, d)| d.stage).collect();
        stages.sort_unstable();
        stages.dedup();
        stages
    }
}

impl FromIterator<(TaskKey, TaskDefinition)> for TaskTable {
    fn from_iter<I: IntoIterator<Item = (TaskKey, TaskDefinition)>>(iter: I) -> Self {
        let mut table = TaskTable::new();
        for (key, def) in iter {
            table.insert(key, def);
        }
        table
    }
}

impl Serialize for TaskTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for TaskTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = TaskTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of task key to task definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TaskTable, A::Error> {
                let mut table = TaskTable::new();
                while let Some((key, def)) = map.next_entry::<TaskKey, TaskDefinition>()? {
                    table.insert(key, def);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

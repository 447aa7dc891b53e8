// src/dag/graph.rs

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{PlanError, Result};
use crate::plan::definition::TaskTable;
use crate::types::TaskKey;

/// A dependency key that does not resolve to any task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    pub task: TaskKey,
    pub missing: TaskKey,
}

impl fmt::Display for MissingDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.task, self.missing)
    }
}

/// A closed dependency path: the first and last keys are the same task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCycle(pub Vec<TaskKey>);

impl DependencyCycle {
    pub fn keys(&self) -> &[TaskKey] {
        &self.0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }
}

impl fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("→"))
    }
}

#[derive(Debug, Clone, Copy)]
enum DepthMark {
    Visiting,
    Done(usize),
}

/// Structural view of the plan's dependency relation.
///
/// Nothing here assumes the relation is valid: dependency keys may be
/// unknown and the graph may contain cycles. Both are what the health
/// checks are for.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    tasks: &'a TaskTable,
    /// Edge direction: dep -> task. Unknown deps become nodes without
    /// dependencies of their own.
    graph: DiGraphMap<&'a str, ()>,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(tasks: &'a TaskTable) -> Self {
        let mut graph: DiGraphMap<&'a str, ()> = DiGraphMap::new();

        for key in tasks.keys() {
            graph.add_node(key);
        }
        for (key, task) in tasks.iter() {
            for dep in task.deps.iter() {
                graph.add_edge(dep.as_str(), key, ());
            }
        }

        Self { tasks, graph }
    }

    /// Every `(task, dependency)` pair whose dependency has no definition, in
    /// plan order. Repeated references are all reported.
    pub fn find_missing_dependencies(&self) -> Vec<MissingDependency> {
        self.tasks
            .iter()
            .flat_map(|(key, task)| {
                task.deps
                    .iter()
                    .filter(|dep| !self.tasks.contains(dep))
                    .map(move |dep| MissingDependency {
                        task: key.to_string(),
                        missing: dep.clone(),
                    })
            })
            .collect()
    }

    /// Depth-first search from every task, in plan order.
    ///
    /// Each root gets its own visited set and reports at most the first cycle
    /// it reaches, as the sub-path from the repeated key back to itself.
    /// Results are deduplicated by exact path, so one cycle reached from
    /// different entry points shows up once per rotation.
    pub fn detect_cycles(&self) -> Vec<DependencyCycle> {
        let mut cycles: Vec<DependencyCycle> = Vec::new();

        for root in self.tasks.keys() {
            let mut visited: HashSet<&'a str> = HashSet::new();
            let mut path: Vec<&'a str> = Vec::new();

            if let Some(cycle) = self.cycle_from(root, &mut visited, &mut path) {
                if !cycles.contains(&cycle) {
                    cycles.push(cycle);
                }
            }
        }

        cycles
    }

    fn cycle_from(
        &self,
        key: &'a str,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> Option<DependencyCycle> {
        if let Some(pos) = path.iter().position(|k| *k == key) {
            let mut cycle: Vec<TaskKey> = path[pos..].iter().map(|k| k.to_string()).collect();
            cycle.push(key.to_string());
            return Some(DependencyCycle(cycle));
        }
        if !visited.insert(key) {
            return None;
        }

        let deps = self.tasks.get(key).map(|t| t.deps.as_slice()).unwrap_or(&[]);

        path.push(key);
        let found = deps
            .iter()
            .find_map(|dep| self.cycle_from(dep.as_str(), visited, path));
        path.pop();

        found
    }

    /// `Err(StructuralDependency)` describing every missing reference and
    /// cycle, `Ok` for a sound graph.
    pub fn validate(&self) -> Result<()> {
        let mut problems: Vec<String> = self
            .find_missing_dependencies()
            .iter()
            .map(|m| format!("missing dependency {m}"))
            .collect();
        problems.extend(self.detect_cycles().iter().map(|c| format!("cycle {c}")));

        if problems.is_empty() {
            Ok(())
        } else {
            Err(PlanError::StructuralDependency(problems.join("; ")))
        }
    }

    /// Cheap acyclicity test (topological sort over the whole graph).
    pub fn is_acyclic(&self) -> bool {
        toposort(&self.graph, None).is_ok()
    }

    /// Length of the longest dependency chain below `key`.
    ///
    /// Tasks without dependencies, and unknown keys, have depth 0.
    ///
    /// # Panics
    ///
    /// Panics if a cycle is reachable from `key`. Callers that cannot rule
    /// that out must check [`Self::is_acyclic`] or [`Self::detect_cycles`]
    /// first.
    pub fn dependency_depth(&self, key: &str) -> usize {
        let mut memo = HashMap::new();
        self.depth_with(key, &mut memo)
    }

    /// Depth of every task, sharing one memo table across the batch.
    ///
    /// # Panics
    ///
    /// Same condition as [`Self::dependency_depth`].
    pub fn depths(&self) -> Vec<(&'a str, usize)> {
        let mut memo = HashMap::new();
        self.tasks
            .keys()
            .map(|key| (key, self.depth_with(key, &mut memo)))
            .collect()
    }

    /// Maximum depth over all tasks (0 for an empty plan).
    pub fn max_depth(&self) -> usize {
        self.depths().into_iter().map(|(_, d)| d).max().unwrap_or(0)
    }

    fn depth_with(&self, key: &str, memo: &mut HashMap<String, DepthMark>) -> usize {
        match memo.get(key) {
            Some(DepthMark::Done(depth)) => return *depth,
            Some(DepthMark::Visiting) => {
                panic!("dependency cycle through task '{key}': depth is unbounded")
            }
            None => {}
        }

        let deps = match self.tasks.get(key) {
            Some(task) if !task.deps.is_empty() => &task.deps,
            _ => {
                memo.insert(key.to_string(), DepthMark::Done(0));
                return 0;
            }
        };

        memo.insert(key.to_string(), DepthMark::Visiting);
        let deepest = deps
            .iter()
            .map(|dep| self.depth_with(dep, memo))
            .max()
            .unwrap_or(0);
        let depth = deepest + 1;
        memo.insert(key.to_string(), DepthMark::Done(depth));
        depth
    }

    /// Tasks past stage 1 that declare no dependencies.
    ///
    /// This is a plan-design smell, not a correctness problem.
    pub fn detect_orphans(&self) -> Vec<TaskKey> {
        self.tasks
            .iter()
            .filter(|(_, task)| task.stage > 1 && task.deps.is_empty())
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Tasks that list `key` as a direct dependency, in plan order.
    pub fn dependents_of(&self, key: &str) -> Vec<&'a str> {
        self.tasks
            .keys()
            .filter(|candidate| self.graph.contains_edge(key, *candidate))
            .collect()
    }
}

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::hierarchy::TaskMap;
use crate::core::level_map::LevelMap;
use crate::core::primitives::millis_between;
use crate::core::task::{RelationTarget, Task, TaskId, TaskKey, TaskOrEmpty};

/// Forward edge stored under the dependent task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedDependency {
    pub source: Task,
    pub source_target: RelationTarget,
    pub own_target: RelationTarget,
}

/// Reverse edge stored under the source task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedDependent {
    pub dependent: Task,
    pub dependent_target: RelationTarget,
    pub source_target: RelationTarget,
}

pub type DependencyMap = LevelMap<Vec<ExpandedDependency>>;
pub type DependentMap = LevelMap<Vec<ExpandedDependent>>;
/// `level -> task id -> source id -> milliseconds`.
pub type EdgeDeltaMap = LevelMap<IndexMap<TaskId, i64>>;

/// Adjacency in both directions plus optional time checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub dependencies: DependencyMap,
    pub dependents: DependentMap,
    /// Signed slack per edge: dependent anchor minus source anchor.
    /// Filled only when warnings are checked.
    pub margins: EdgeDeltaMap,
    /// Positive violation per edge (source anchor later than dependent
    /// anchor). Filled only when warnings are checked.
    pub warnings: EdgeDeltaMap,
}

impl DependencyGraph {
    #[must_use]
    pub fn dependencies_of(&self, task: &Task) -> &[ExpandedDependency] {
        self.dependencies
            .get(task.comparison_level, &task.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn dependents_of(&self, task: &Task) -> &[ExpandedDependent] {
        self.dependents
            .get(task.comparison_level, &task.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn margin(&self, task: &TaskKey, source_id: &TaskId) -> Option<i64> {
        self.margins
            .get(task.level, &task.id)
            .and_then(|sources| sources.get(source_id))
            .copied()
    }

    /// Tasks with at least one violated incoming dependency.
    #[must_use]
    pub fn tasks_with_warnings(&self) -> HashSet<TaskKey> {
        self.warnings
            .iter()
            .filter(|(_, _, sources)| !sources.is_empty())
            .map(|(level, id, _)| TaskKey::new(level, id.clone()))
            .collect()
    }
}

/// Resolves every task's dependency list against `task_map`.
///
/// Unresolvable sources (unknown id, other level, placeholder row, self
/// reference) are logged and skipped; the rest of the graph is kept.
#[must_use]
pub fn build_dependency_and_dependent_maps(
    tasks: &[TaskOrEmpty],
    task_map: &TaskMap,
    check_warnings: bool,
) -> DependencyGraph {
    let mut graph = DependencyGraph::default();

    for task in tasks.iter().filter_map(TaskOrEmpty::as_task) {
        let level = task.comparison_level;
        for dependency in &task.dependencies {
            let Some(source) = resolve_source(task, dependency.source_id.clone(), task_map) else {
                continue;
            };

            graph
                .dependencies
                .get_or_insert_with(level, task.id.clone(), Vec::new)
                .push(ExpandedDependency {
                    source: source.clone(),
                    source_target: dependency.source_target,
                    own_target: dependency.own_target,
                });
            graph
                .dependents
                .get_or_insert_with(level, source.id.clone(), Vec::new)
                .push(ExpandedDependent {
                    dependent: task.clone(),
                    dependent_target: dependency.own_target,
                    source_target: dependency.source_target,
                });

            if check_warnings {
                let margin = edge_margin_ms(
                    source,
                    dependency.source_target,
                    task,
                    dependency.own_target,
                );
                let margins = graph
                    .margins
                    .get_or_insert_with(level, task.id.clone(), IndexMap::new);
                let slot = margins.entry(source.id.clone()).or_insert(margin);
                *slot = (*slot).min(margin);

                if margin < 0 {
                    let warnings =
                        graph
                            .warnings
                            .get_or_insert_with(level, task.id.clone(), IndexMap::new);
                    let slot = warnings.entry(source.id.clone()).or_insert(-margin);
                    *slot = (*slot).max(-margin);
                }
            }
        }
    }

    debug!(
        edges = graph.dependencies.iter().map(|(_, _, edges)| edges.len()).sum::<usize>(),
        violations = graph.warnings.len(),
        "built dependency graph"
    );
    graph
}

/// Signed slack of one edge in milliseconds; negative means the dependent
/// anchor sits before the source anchor.
#[must_use]
pub fn edge_margin_ms(
    source: &Task,
    source_target: RelationTarget,
    dependent: &Task,
    own_target: RelationTarget,
) -> i64 {
    millis_between(source.anchor(source_target), dependent.anchor(own_target))
}

fn resolve_source<'a>(task: &Task, source_id: TaskId, task_map: &'a TaskMap) -> Option<&'a Task> {
    let level = task.comparison_level;
    if source_id == task.id {
        warn!(level, task_id = %task.id, "task depends on itself; edge skipped");
        return None;
    }
    match task_map.get(level, &source_id) {
        Some(TaskOrEmpty::Task(source)) => Some(source),
        Some(TaskOrEmpty::Empty(_)) => {
            warn!(
                level,
                task_id = %task.id,
                source_id = %source_id,
                "dependency source is a placeholder row; edge skipped"
            );
            None
        }
        None => {
            warn!(
                level,
                task_id = %task.id,
                source_id = %source_id,
                "dependency source not found at the same comparison level; edge skipped"
            );
            None
        }
    }
}

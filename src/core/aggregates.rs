use std::collections::HashSet;

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::dependency::DependencyGraph;
use crate::core::hierarchy::{ChildMap, RootMap, TaskMap};
use crate::core::level_map::LevelMap;
use crate::core::task::{ComparisonLevel, Task, TaskId, TaskKey, TaskOrEmpty};

/// Whether `maybe_descendant` sits below `maybe_ancestor` in the parent
/// chain of the same comparison level.
///
/// A corrupted (cyclic) chain is reported and answers `false`.
#[must_use]
pub fn check_is_descendant(
    maybe_ancestor: &TaskOrEmpty,
    maybe_descendant: &TaskOrEmpty,
    task_map: &TaskMap,
) -> bool {
    let level = maybe_descendant.comparison_level();
    if maybe_ancestor.comparison_level() != level {
        return false;
    }
    let target = maybe_ancestor.id();
    let mut visited: HashSet<&TaskId> = HashSet::new();
    visited.insert(maybe_descendant.id());

    let mut current = maybe_descendant;
    while let Some(parent_id) = current.parent() {
        if parent_id == target {
            return true;
        }
        if !visited.insert(parent_id) {
            warn!(
                level,
                task_id = %maybe_descendant.id(),
                repeated_id = %parent_id,
                "parent chain is cyclic; treating as unrelated"
            );
            return false;
        }
        match task_map.get(level, parent_id) {
            Some(parent @ TaskOrEmpty::Task(_)) => current = parent,
            Some(TaskOrEmpty::Empty(_)) | None => return false,
        }
    }
    false
}

/// Ancestor chain, nearest parent first. Stops at a root, an unresolved
/// id, a placeholder row, or a repeated id.
#[must_use]
pub fn collect_parents(task: &TaskOrEmpty, task_map: &TaskMap) -> Vec<Task> {
    let level = task.comparison_level();
    let mut parents = Vec::new();
    let mut visited: HashSet<TaskId> = HashSet::new();
    visited.insert(task.id().clone());

    let mut next = task.parent().cloned();
    while let Some(parent_id) = next {
        if !visited.insert(parent_id.clone()) {
            warn!(
                level,
                task_id = %task.id(),
                repeated_id = %parent_id,
                "parent chain is cyclic; ancestor walk truncated"
            );
            break;
        }
        match task_map.get(level, &parent_id) {
            Some(TaskOrEmpty::Task(parent)) => {
                next = parent.parent.clone();
                parents.push(parent.clone());
            }
            Some(TaskOrEmpty::Empty(_)) | None => break,
        }
    }
    parents
}

/// Every descendant in pre-order. Placeholder rows are returned as leaves
/// when `include_empty` is set and skipped otherwise.
#[must_use]
pub fn get_all_descendants(
    task: &TaskOrEmpty,
    child_map: &ChildMap,
    include_empty: bool,
) -> Vec<TaskOrEmpty> {
    let level = task.comparison_level();
    let mut result = Vec::new();
    let mut visited: HashSet<TaskId> = HashSet::new();
    visited.insert(task.id().clone());
    collect_descendants(task.id(), level, child_map, include_empty, &mut visited, &mut result);
    result
}

fn collect_descendants(
    id: &TaskId,
    level: ComparisonLevel,
    child_map: &ChildMap,
    include_empty: bool,
    visited: &mut HashSet<TaskId>,
    result: &mut Vec<TaskOrEmpty>,
) {
    let Some(children) = child_map.get(level, id) else {
        return;
    };
    for child in children {
        if !visited.insert(child.id().clone()) {
            warn!(
                level,
                task_id = %id,
                repeated_id = %child.id(),
                "descendant walk met a repeated row; subtree skipped"
            );
            continue;
        }
        match child {
            TaskOrEmpty::Empty(_) => {
                if include_empty {
                    result.push(child.clone());
                }
            }
            TaskOrEmpty::Task(_) => {
                result.push(child.clone());
                collect_descendants(child.id(), level, child_map, include_empty, visited, result);
            }
        }
    }
}

/// Envelope of the direct dated children of a row.
#[must_use]
pub fn children_envelope(
    level: ComparisonLevel,
    parent_id: &TaskId,
    child_map: &ChildMap,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    child_map
        .get(level, parent_id)?
        .iter()
        .filter_map(TaskOrEmpty::as_task)
        .fold(None, |envelope, child| {
            Some(match envelope {
                None => (child.start, child.end),
                Some((start, end)) => (child.start.min(start), child.end.max(end)),
            })
        })
}

/// Parent whose own bounds differ from the envelope of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildOutOfParentWarning {
    pub envelope_start: NaiveDateTime,
    pub envelope_end: NaiveDateTime,
    /// A child starts before the parent.
    pub start_outside: bool,
    /// A child ends after the parent.
    pub end_outside: bool,
}

pub type ChildOutOfParentWarnings = LevelMap<ChildOutOfParentWarning>;

#[must_use]
pub fn get_child_out_of_parent_warnings(
    tasks: &[TaskOrEmpty],
    child_map: &ChildMap,
) -> ChildOutOfParentWarnings {
    let mut warnings = ChildOutOfParentWarnings::new();
    for parent in tasks.iter().filter_map(TaskOrEmpty::as_task) {
        let Some((envelope_start, envelope_end)) =
            children_envelope(parent.comparison_level, &parent.id, child_map)
        else {
            continue;
        };
        if envelope_start == parent.start && envelope_end == parent.end {
            continue;
        }
        warnings.insert(
            parent.comparison_level,
            parent.id.clone(),
            ChildOutOfParentWarning {
                envelope_start,
                envelope_end,
                start_outside: envelope_start < parent.start,
                end_outside: envelope_end > parent.end,
            },
        );
    }
    warnings
}

/// Critical tasks of one comparison level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalPath {
    pub task_ids: IndexSet<TaskId>,
    /// `dependent id -> critical source ids`.
    pub dependencies: IndexMap<TaskId, IndexSet<TaskId>>,
}

impl CriticalPath {
    #[must_use]
    pub fn contains(&self, id: &TaskId) -> bool {
        self.task_ids.contains(id)
    }

    #[must_use]
    pub fn is_critical_edge(&self, dependent: &TaskId, source: &TaskId) -> bool {
        self.dependencies
            .get(dependent)
            .is_some_and(|sources| sources.contains(source))
    }
}

pub type CriticalPaths = IndexMap<ComparisonLevel, CriticalPath>;

/// Backward-pass approximation of the critical path.
///
/// For each root, the childless descendants finishing last are critical
/// together with their ancestor chain. From every critical task, incoming
/// dependency edges with zero or negative margin are followed backwards.
/// Without margins only the hierarchy part is computed.
#[must_use]
pub fn get_critical_path(
    root_map: &RootMap,
    child_map: &ChildMap,
    task_map: &TaskMap,
    graph: &DependencyGraph,
) -> CriticalPaths {
    let mut paths = CriticalPaths::new();

    for (level, root_ids) in root_map {
        let mut path = CriticalPath::default();
        let mut visited: HashSet<TaskId> = HashSet::new();

        for root_id in root_ids {
            let Some(root @ TaskOrEmpty::Task(_)) = task_map.get(*level, root_id) else {
                continue;
            };
            for latest in latest_leaves(root, child_map) {
                mark_critical(
                    latest,
                    *level,
                    task_map,
                    graph,
                    &mut path,
                    &mut visited,
                );
            }
        }

        debug!(
            level = *level,
            critical_tasks = path.task_ids.len(),
            "computed critical path"
        );
        paths.insert(*level, path);
    }
    paths
}

fn latest_leaves(root: &TaskOrEmpty, child_map: &ChildMap) -> Vec<Task> {
    let level = root.comparison_level();
    let mut leaves: Vec<Task> = get_all_descendants(root, child_map, false)
        .into_iter()
        .filter_map(|row| match row {
            TaskOrEmpty::Task(task) => Some(task),
            TaskOrEmpty::Empty(_) => None,
        })
        .filter(|task| {
            child_map
                .get(level, &task.id)
                .is_none_or(|children| children.iter().all(TaskOrEmpty::is_empty))
        })
        .collect();

    if leaves.is_empty() {
        if let TaskOrEmpty::Task(task) = root {
            leaves.push(task.clone());
        }
    }

    let Some(latest_end) = leaves.iter().map(|task| task.end).max() else {
        return Vec::new();
    };
    leaves.retain(|task| task.end == latest_end);
    leaves
}

fn mark_critical(
    start: Task,
    level: ComparisonLevel,
    task_map: &TaskMap,
    graph: &DependencyGraph,
    path: &mut CriticalPath,
    visited: &mut HashSet<TaskId>,
) {
    let mut stack = vec![start];
    while let Some(task) = stack.pop() {
        if !visited.insert(task.id.clone()) {
            continue;
        }
        path.task_ids.insert(task.id.clone());
        for parent in collect_parents(&TaskOrEmpty::Task(task.clone()), task_map) {
            path.task_ids.insert(parent.id);
        }

        let key = TaskKey::new(level, task.id.clone());
        for edge in graph.dependencies_of(&task) {
            let Some(margin) = graph.margin(&key, &edge.source.id) else {
                continue;
            };
            if margin > 0 {
                continue;
            }
            path.dependencies
                .entry(task.id.clone())
                .or_default()
                .insert(edge.source.id.clone());
            stack.push(edge.source.clone());
        }
    }
}

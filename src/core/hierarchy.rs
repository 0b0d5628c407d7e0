use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::level_map::LevelMap;
use crate::core::task::{ComparisonLevel, TaskId, TaskKey, TaskOrEmpty};
use crate::error::{GanttError, GanttResult};

/// `level -> id -> row`.
pub type TaskMap = LevelMap<TaskOrEmpty>;
/// `level -> parent id -> direct children in input order`.
pub type ChildMap = LevelMap<Vec<TaskOrEmpty>>;
/// `level -> id -> position in the input list`.
pub type GlobalIndexMap = LevelMap<usize>;
/// `level -> ids without a (resolvable) parent`, in input order.
pub type RootMap = IndexMap<ComparisonLevel, Vec<TaskId>>;
/// Collapsed rows: their subtree is skipped by the visible row walk.
pub type CollapsedSet = HashSet<TaskKey>;

/// Dotted ordinal of a row, e.g. `2.1.3` at depth 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedIndex {
    pub depth: usize,
    pub label: String,
}

/// Stable sort by `display_order`; rows without an order keep their
/// relative position after all ordered rows.
#[must_use]
pub fn sort_tasks(tasks: &[TaskOrEmpty]) -> Vec<TaskOrEmpty> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| match task.display_order() {
        Some(order) => (0u8, order),
        None => (1u8, 0),
    });
    sorted
}

#[must_use]
pub fn build_task_map(tasks: &[TaskOrEmpty]) -> TaskMap {
    let mut map = TaskMap::new();
    for task in tasks {
        map.insert(task.comparison_level(), task.id().clone(), task.clone());
    }
    map
}

#[must_use]
pub fn build_global_index_map(tasks: &[TaskOrEmpty]) -> GlobalIndexMap {
    let mut map = GlobalIndexMap::new();
    for (index, task) in tasks.iter().enumerate() {
        map.insert(task.comparison_level(), task.id().clone(), index);
    }
    map
}

/// Groups rows under their parent. References to parents absent from the
/// same level, and self-parenting rows, are dropped with a warning.
#[must_use]
pub fn build_child_map(tasks: &[TaskOrEmpty]) -> ChildMap {
    let known = known_ids(tasks);
    let mut map = ChildMap::new();
    for task in tasks {
        let Some(parent) = resolvable_parent(task, &known) else {
            continue;
        };
        map.get_or_insert_with(task.comparison_level(), parent.clone(), Vec::new)
            .push(task.clone());
    }
    map
}

/// Rows without a resolvable parent, per level. Every level present in
/// `tasks` gets an entry, even when it has no root.
#[must_use]
pub fn build_root_map(tasks: &[TaskOrEmpty]) -> RootMap {
    let known = known_ids(tasks);
    let mut map = RootMap::new();
    for task in tasks {
        let roots = map.entry(task.comparison_level()).or_default();
        if resolvable_parent(task, &known).is_none() {
            roots.push(task.id().clone());
        }
    }
    map
}

#[must_use]
pub fn collapsed_set_from_tasks(tasks: &[TaskOrEmpty]) -> CollapsedSet {
    tasks
        .iter()
        .filter_map(TaskOrEmpty::as_task)
        .filter(|task| task.hide_children)
        .map(|task| task.key())
        .collect()
}

/// Visible row positions produced by a pre-order walk of each forest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowIndexMap {
    task_to_row: LevelMap<usize>,
    row_to_task: IndexMap<ComparisonLevel, Vec<TaskId>>,
}

impl RowIndexMap {
    /// Row of a visible task. Hidden rows have none and must not be laid out.
    pub fn row_of(&self, level: ComparisonLevel, id: &TaskId) -> GanttResult<usize> {
        self.task_to_row.level(level)?.get(id).copied().ok_or_else(|| {
            GanttError::MissingRowIndex {
                level,
                id: id.to_string(),
            }
        })
    }

    #[must_use]
    pub fn get(&self, level: ComparisonLevel, id: &TaskId) -> Option<usize> {
        self.task_to_row.get(level, id).copied()
    }

    #[must_use]
    pub fn task_at(&self, level: ComparisonLevel, row: usize) -> Option<&TaskId> {
        self.row_to_task.get(&level).and_then(|rows| rows.get(row))
    }

    /// Visible ids of a level in row order.
    #[must_use]
    pub fn rows(&self, level: ComparisonLevel) -> &[TaskId] {
        self.row_to_task
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of row bands, i.e. the tallest level.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_to_task.values().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn entries(&self) -> &LevelMap<usize> {
        &self.task_to_row
    }
}

/// Assigns row positions in pre-order. A collapsed row keeps its own row
/// while its whole subtree is skipped.
#[must_use]
pub fn build_visible_row_index_map(
    sorted_tasks: &[TaskOrEmpty],
    collapsed: &CollapsedSet,
) -> RowIndexMap {
    let child_map = build_child_map(sorted_tasks);
    let mut result = RowIndexMap::default();

    walk_forests(sorted_tasks, &child_map, |task, _depth, _ordinal_path| {
        let level = task.comparison_level();
        let rows = result.row_to_task.entry(level).or_default();
        result.task_to_row.insert(level, task.id().clone(), rows.len());
        rows.push(task.id().clone());
        !collapsed.contains(&task.key())
    });

    result
}

/// Dotted ordinals from a full pre-order walk, independent of collapse.
#[must_use]
pub fn build_nested_index_map(sorted_tasks: &[TaskOrEmpty]) -> LevelMap<NestedIndex> {
    let child_map = build_child_map(sorted_tasks);
    let mut result = LevelMap::new();

    walk_forests(sorted_tasks, &child_map, |task, depth, ordinal_path| {
        let label = ordinal_path
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(".");
        result.insert(
            task.comparison_level(),
            task.id().clone(),
            NestedIndex { depth, label },
        );
        true
    });

    result
}

/// Rows in visible order across all levels (level-major).
#[must_use]
pub fn visible_tasks(sorted_tasks: &[TaskOrEmpty], collapsed: &CollapsedSet) -> Vec<TaskOrEmpty> {
    let rows = build_visible_row_index_map(sorted_tasks, collapsed);
    let task_map = build_task_map(sorted_tasks);
    rows.row_to_task
        .iter()
        .flat_map(|(level, ids)| ids.iter().filter_map(|id| task_map.get(*level, id)))
        .cloned()
        .collect()
}

/// Pre-order walk from each root. `visit` returns whether to descend.
///
/// Rows unreachable from any root (parent cycles, rows under placeholders)
/// are walked afterwards as extra roots so every row is visited exactly once.
fn walk_forests(
    sorted_tasks: &[TaskOrEmpty],
    child_map: &ChildMap,
    mut visit: impl FnMut(&TaskOrEmpty, usize, &[usize]) -> bool,
) {
    let roots = build_root_map(sorted_tasks);
    let task_map = build_task_map(sorted_tasks);
    let mut visited: HashSet<TaskKey> = HashSet::new();

    for (level, root_ids) in &roots {
        let mut ordinal = 0usize;
        for root_id in root_ids {
            let Some(root) = task_map.get(*level, root_id) else {
                continue;
            };
            ordinal += 1;
            walk_subtree(root, child_map, &mut visited, &mut vec![ordinal], &mut visit);
        }

        for task in sorted_tasks
            .iter()
            .filter(|task| task.comparison_level() == *level)
        {
            if visited.contains(&task.key()) {
                continue;
            }
            warn!(
                level = *level,
                task_id = %task.id(),
                "row is unreachable from any root; walked as an extra root"
            );
            ordinal += 1;
            walk_subtree(task, child_map, &mut visited, &mut vec![ordinal], &mut visit);
        }
    }
}

fn walk_subtree(
    task: &TaskOrEmpty,
    child_map: &ChildMap,
    visited: &mut HashSet<TaskKey>,
    path: &mut Vec<usize>,
    visit: &mut impl FnMut(&TaskOrEmpty, usize, &[usize]) -> bool,
) {
    if !visited.insert(task.key()) {
        return;
    }
    let descend = visit(task, path.len(), path);
    if task.is_empty() {
        return;
    }
    if !descend {
        skip_subtree(task, child_map, visited);
        return;
    }
    let Some(children) = child_map.get(task.comparison_level(), task.id()) else {
        return;
    };
    for (position, child) in children.iter().enumerate() {
        path.push(position + 1);
        walk_subtree(child, child_map, visited, path, visit);
        path.pop();
    }
}

/// Marks a hidden subtree as visited so it is not picked up as extra roots.
fn skip_subtree(task: &TaskOrEmpty, child_map: &ChildMap, visited: &mut HashSet<TaskKey>) {
    let mut stack = vec![task.clone()];
    while let Some(current) = stack.pop() {
        let Some(children) = child_map.get(current.comparison_level(), current.id()) else {
            continue;
        };
        for child in children {
            if visited.insert(child.key()) {
                stack.push(child.clone());
            }
        }
    }
}

fn known_ids(tasks: &[TaskOrEmpty]) -> HashSet<TaskKey> {
    tasks.iter().map(TaskOrEmpty::key).collect()
}

fn resolvable_parent<'a>(task: &'a TaskOrEmpty, known: &HashSet<TaskKey>) -> Option<&'a TaskId> {
    let parent = task.parent()?;
    if parent == task.id() {
        warn!(
            level = task.comparison_level(),
            task_id = %task.id(),
            "row references itself as parent; treating as root"
        );
        return None;
    }
    if !known.contains(&TaskKey::new(task.comparison_level(), parent.clone())) {
        warn!(
            level = task.comparison_level(),
            task_id = %task.id(),
            parent_id = %parent,
            "parent not found at the same comparison level; treating as root"
        );
        return None;
    }
    Some(parent)
}

/// Bundled, read-only hierarchy view over one task snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    pub tasks: Vec<TaskOrEmpty>,
    pub sorted: Vec<TaskOrEmpty>,
    pub task_map: TaskMap,
    pub child_map: ChildMap,
    pub root_map: RootMap,
    pub global_index_map: GlobalIndexMap,
}

impl TaskIndex {
    #[must_use]
    pub fn build(tasks: Vec<TaskOrEmpty>) -> Self {
        let sorted = sort_tasks(&tasks);
        Self {
            task_map: build_task_map(&tasks),
            child_map: build_child_map(&sorted),
            root_map: build_root_map(&sorted),
            global_index_map: build_global_index_map(&tasks),
            sorted,
            tasks,
        }
    }

    pub fn task(&self, level: ComparisonLevel, id: &TaskId) -> GanttResult<&TaskOrEmpty> {
        self.task_map.try_get(level, id)
    }

    pub fn global_index(&self, level: ComparisonLevel, id: &TaskId) -> GanttResult<usize> {
        self.global_index_map.try_get(level, id).copied()
    }

    #[must_use]
    pub fn children(&self, level: ComparisonLevel, id: &TaskId) -> &[TaskOrEmpty] {
        self.child_map
            .get(level, id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn comparison_levels(&self) -> impl Iterator<Item = ComparisonLevel> + '_ {
        self.root_map.keys().copied()
    }
}

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::aggregates::{collect_parents, get_all_descendants};
use crate::core::dependency::DependencyGraph;
use crate::core::hierarchy::TaskIndex;
use crate::core::primitives::{add_millis, millis_between};
use crate::core::task::{ComparisonLevel, Task, TaskId, TaskKey, TaskOrEmpty};

/// Which part of a bar a gesture manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMoveAction {
    Progress,
    End,
    Start,
    Move,
}

/// Edit proposed to the host, before it is applied to the task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeAction {
    /// One row replaced by an edited copy.
    Change { task: TaskOrEmpty },
    /// Dates changed by a bar gesture.
    ChangeStartAndEnd {
        action: BarMoveAction,
        changed: Task,
        original: Task,
    },
    AddChildren {
        parent: TaskOrEmpty,
        descendants: Vec<TaskOrEmpty>,
    },
    Delete { tasks: Vec<TaskOrEmpty> },
    /// `task_for_move` becomes the next sibling of `target`.
    MoveAfter {
        target: TaskOrEmpty,
        task_for_move: TaskOrEmpty,
    },
    MoveInside {
        parent: TaskOrEmpty,
        children: Vec<TaskOrEmpty>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOptions {
    /// Shift the whole subtree when a parent bar is moved.
    pub move_children_with_parent: bool,
    /// Suggest new envelopes for every affected ancestor.
    pub update_parents_on_change: bool,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            move_children_with_parent: true,
            update_parents_on_change: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskIndexEntry {
    pub level: ComparisonLevel,
    pub id: TaskId,
    pub index: usize,
}

/// Cascaded bounds the host can splice into its list at `index`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeSuggestion {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub task: Task,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeMetadata {
    /// Tasks depending on any touched task.
    pub dependent_tasks: Vec<Task>,
    /// Global index of each primarily touched row.
    pub task_indexes: Vec<TaskIndexEntry>,
    /// Ancestors and descendants whose bounds should follow the change.
    pub parents_and_descendants: Vec<Task>,
    pub suggestions: Vec<ChangeSuggestion>,
}

/// Hierarchy as it would look after the action, without rebuilding maps.
#[derive(Default)]
struct Overlay {
    overrides: HashMap<TaskKey, (NaiveDateTime, NaiveDateTime)>,
    /// Rows no longer under their original parent (moved or deleted).
    detached: HashSet<TaskKey>,
    deleted: HashSet<TaskKey>,
    attached: HashMap<TaskKey, Vec<TaskOrEmpty>>,
}

impl Overlay {
    fn children<'a>(&'a self, index: &'a TaskIndex, key: &TaskKey) -> Vec<&'a TaskOrEmpty> {
        let mut children: Vec<&TaskOrEmpty> = index
            .children(key.level, &key.id)
            .iter()
            .filter(|child| !self.detached.contains(&child.key()))
            .collect();
        if let Some(extra) = self.attached.get(key) {
            children.extend(extra.iter().filter(|child| !self.deleted.contains(&child.key())));
        }
        children
    }

    fn attach(&mut self, parent: TaskKey, child: TaskOrEmpty) {
        self.attached.entry(parent).or_default().push(child);
    }
}

/// Computes dependents, indexes and cascading suggestions for an action.
#[must_use]
pub fn resolve_change_metadata(
    action: &ChangeAction,
    index: &TaskIndex,
    graph: &DependencyGraph,
    options: ChangeOptions,
) -> ChangeMetadata {
    let mut overlay = Overlay::default();
    let mut touched: Vec<TaskOrEmpty> = Vec::new();
    let mut chain_sources: Vec<TaskOrEmpty> = Vec::new();
    let mut extra_ancestors: Vec<TaskOrEmpty> = Vec::new();
    let mut shifted_descendants: Vec<(Task, NaiveDateTime, NaiveDateTime)> = Vec::new();

    match action {
        ChangeAction::Change { task } => {
            if let TaskOrEmpty::Task(changed) = task {
                overlay
                    .overrides
                    .insert(changed.key(), (changed.start, changed.end));
            }
            touched.push(task.clone());
            chain_sources.push(task.clone());
        }
        ChangeAction::ChangeStartAndEnd {
            action,
            changed,
            original,
        } => {
            overlay
                .overrides
                .insert(changed.key(), (changed.start, changed.end));
            if *action == BarMoveAction::Move && options.move_children_with_parent {
                let delta_ms = millis_between(original.start, changed.start);
                let original_row = TaskOrEmpty::Task(original.clone());
                for descendant in get_all_descendants(&original_row, &index.child_map, false) {
                    let TaskOrEmpty::Task(descendant) = descendant else {
                        continue;
                    };
                    let start = add_millis(descendant.start, delta_ms);
                    let end = add_millis(descendant.end, delta_ms);
                    overlay.overrides.insert(descendant.key(), (start, end));
                    shifted_descendants.push((descendant, start, end));
                }
            }
            touched.push(TaskOrEmpty::Task(changed.clone()));
            chain_sources.push(TaskOrEmpty::Task(original.clone()));
        }
        ChangeAction::AddChildren {
            parent,
            descendants,
        } => {
            for descendant in descendants {
                let parent_key = match descendant.parent() {
                    Some(parent_id) => TaskKey::new(descendant.comparison_level(), parent_id.clone()),
                    None => parent.key(),
                };
                overlay.attach(parent_key, descendant.clone());
            }
            touched.push(parent.clone());
            extra_ancestors.push(parent.clone());
            chain_sources.push(parent.clone());
        }
        ChangeAction::Delete { tasks } => {
            for task in tasks {
                overlay.detached.insert(task.key());
                overlay.deleted.insert(task.key());
                for descendant in get_all_descendants(task, &index.child_map, true) {
                    overlay.detached.insert(descendant.key());
                    overlay.deleted.insert(descendant.key());
                }
                touched.push(task.clone());
                chain_sources.push(task.clone());
            }
        }
        ChangeAction::MoveAfter {
            target,
            task_for_move,
        } => {
            overlay.detached.insert(task_for_move.key());
            if let Some(new_parent_id) = target.parent() {
                let parent_key = TaskKey::new(target.comparison_level(), new_parent_id.clone());
                overlay.attach(
                    parent_key,
                    task_for_move.clone().with_parent(Some(new_parent_id.clone())),
                );
            }
            touched.push(task_for_move.clone());
            touched.push(target.clone());
            chain_sources.push(task_for_move.clone());
            chain_sources.push(target.clone());
        }
        ChangeAction::MoveInside { parent, children } => {
            for child in children {
                overlay.detached.insert(child.key());
                overlay.attach(
                    parent.key(),
                    child.clone().with_parent(Some(parent.id().clone())),
                );
                touched.push(child.clone());
                chain_sources.push(child.clone());
            }
            touched.push(parent.clone());
            extra_ancestors.push(parent.clone());
            chain_sources.push(parent.clone());
        }
    }

    let mut metadata = ChangeMetadata::default();

    if options.update_parents_on_change {
        let ancestors = affected_ancestors(index, &overlay, &chain_sources, &extra_ancestors);
        let ancestor_keys: HashSet<TaskKey> = ancestors.iter().map(Task::key).collect();
        let mut memo: HashMap<TaskKey, Option<(NaiveDateTime, NaiveDateTime)>> = HashMap::new();
        for ancestor in &ancestors {
            let mut visiting = HashSet::new();
            let Some((start, end)) = envelope_of(
                &ancestor.key(),
                index,
                &overlay,
                &ancestor_keys,
                &mut memo,
                &mut visiting,
            ) else {
                continue;
            };
            if start == ancestor.start && end == ancestor.end {
                continue;
            }
            push_suggestion(&mut metadata, index, ancestor.clone(), start, end);
        }
    }

    for (descendant, start, end) in shifted_descendants {
        push_suggestion(&mut metadata, index, descendant, start, end);
    }

    metadata.dependent_tasks = collect_dependents(graph, index, &touched, &overlay, &metadata);

    let mut seen_indexes: HashSet<TaskKey> = HashSet::new();
    for task in &touched {
        if !seen_indexes.insert(task.key()) {
            continue;
        }
        match index.global_index_map.get(task.comparison_level(), task.id()) {
            Some(position) => metadata.task_indexes.push(TaskIndexEntry {
                level: task.comparison_level(),
                id: task.id().clone(),
                index: *position,
            }),
            None => warn!(
                level = task.comparison_level(),
                task_id = %task.id(),
                "touched row has no global index; skipped"
            ),
        }
    }

    debug!(
        dependents = metadata.dependent_tasks.len(),
        suggestions = metadata.suggestions.len(),
        "resolved change metadata"
    );
    metadata
}

fn push_suggestion(
    metadata: &mut ChangeMetadata,
    index: &TaskIndex,
    task: Task,
    start: NaiveDateTime,
    end: NaiveDateTime,
) {
    let Some(position) = index.global_index_map.get(task.comparison_level, &task.id) else {
        warn!(
            level = task.comparison_level,
            task_id = %task.id,
            "suggested row has no global index; skipped"
        );
        return;
    };
    metadata.parents_and_descendants.push(task.clone());
    metadata.suggestions.push(ChangeSuggestion {
        start,
        end,
        task,
        index: *position,
    });
}

/// Ancestors of every chain source, nearest first, deduplicated, with
/// deleted rows removed.
fn affected_ancestors(
    index: &TaskIndex,
    overlay: &Overlay,
    chain_sources: &[TaskOrEmpty],
    extra_ancestors: &[TaskOrEmpty],
) -> Vec<Task> {
    let mut seen: IndexSet<TaskKey> = IndexSet::new();
    let mut result = Vec::new();
    let mut push = |task: Task, result: &mut Vec<Task>| {
        if overlay.deleted.contains(&task.key()) {
            return;
        }
        if seen.insert(task.key()) {
            result.push(task);
        }
    };

    for extra in extra_ancestors {
        if let Some(TaskOrEmpty::Task(current)) = index.task_map.get(extra.comparison_level(), extra.id())
        {
            push(current.clone(), &mut result);
        }
    }
    for source in chain_sources {
        let current = index
            .task_map
            .get(source.comparison_level(), source.id())
            .unwrap_or(source);
        for parent in collect_parents(current, &index.task_map) {
            push(parent, &mut result);
        }
    }
    result
}

/// Envelope of all overlay descendants of a row. Affected ancestors are
/// replaced by their recomputed envelope; other children widen theirs by
/// their own bounds. Overridden rows contribute their new bounds.
fn envelope_of(
    key: &TaskKey,
    index: &TaskIndex,
    overlay: &Overlay,
    ancestor_keys: &HashSet<TaskKey>,
    memo: &mut HashMap<TaskKey, Option<(NaiveDateTime, NaiveDateTime)>>,
    visiting: &mut HashSet<TaskKey>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    if let Some(cached) = memo.get(key) {
        return *cached;
    }
    if !visiting.insert(key.clone()) {
        warn!(
            level = key.level,
            task_id = %key.id,
            "cycle while computing parent envelope; branch ignored"
        );
        return None;
    }

    let mut envelope: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for child in overlay.children(index, key) {
        let TaskOrEmpty::Task(child_task) = child else {
            continue;
        };
        let child_key = child_task.key();
        let bounds = if let Some(bounds) = overlay.overrides.get(&child_key) {
            Some(*bounds)
        } else {
            let nested = envelope_of(&child_key, index, overlay, ancestor_keys, memo, visiting);
            let own = (child_task.start, child_task.end);
            if ancestor_keys.contains(&child_key) {
                nested.or(Some(own))
            } else {
                // Untouched subtrees may hold stale bounds; their rows still count.
                Some(match nested {
                    None => own,
                    Some((start, end)) => (own.0.min(start), own.1.max(end)),
                })
            }
        };
        if let Some((start, end)) = bounds {
            envelope = Some(match envelope {
                None => (start, end),
                Some((min, max)) => (min.min(start), max.max(end)),
            });
        }
    }

    visiting.remove(key);
    memo.insert(key.clone(), envelope);
    envelope
}

fn collect_dependents(
    graph: &DependencyGraph,
    index: &TaskIndex,
    touched: &[TaskOrEmpty],
    overlay: &Overlay,
    metadata: &ChangeMetadata,
) -> Vec<Task> {
    let mut sources: Vec<&Task> = touched.iter().filter_map(TaskOrEmpty::as_task).collect();
    sources.extend(metadata.parents_and_descendants.iter());
    // Deleted rows take their outgoing edges with them.
    sources.extend(overlay.deleted.iter().filter_map(|key| {
        index
            .task_map
            .get(key.level, &key.id)
            .and_then(TaskOrEmpty::as_task)
    }));

    let excluded: HashSet<TaskKey> = touched
        .iter()
        .map(TaskOrEmpty::key)
        .chain(overlay.deleted.iter().cloned())
        .collect();

    let mut seen: HashSet<TaskKey> = HashSet::new();
    let mut dependents = Vec::new();
    for source in sources {
        for edge in graph.dependents_of(source) {
            let key = edge.dependent.key();
            if excluded.contains(&key) || !seen.insert(key) {
                continue;
            }
            dependents.push(edge.dependent.clone());
        }
    }
    dependents
}

/// New bounds moving `task` past its largest dependency violation.
#[must_use]
pub fn suggest_dependency_fix(
    task: &Task,
    graph: &DependencyGraph,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let violation = graph
        .warnings
        .get(task.comparison_level, &task.id)?
        .values()
        .copied()
        .max()?;
    Some((add_millis(task.start, violation), add_millis(task.end, violation)))
}

/// Bounds a parent should take to contain exactly its dated children.
#[must_use]
pub fn suggest_parent_fit(task: &Task, index: &TaskIndex) -> Option<(NaiveDateTime, NaiveDateTime)> {
    crate::core::aggregates::children_envelope(task.comparison_level, &task.id, &index.child_map)
}

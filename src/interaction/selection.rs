use std::collections::HashMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::aggregates::{check_is_descendant, get_all_descendants};
use crate::core::change_metadata::ChangeAction;
use crate::core::hierarchy::TaskIndex;
use crate::core::task::{TaskId, TaskKey, TaskOrEmpty};

/// Selected rows in selection order, plus the anchor for range selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: IndexSet<TaskKey>,
    anchor: Option<TaskKey>,
}

impl SelectionState {
    #[must_use]
    pub fn selected(&self) -> &IndexSet<TaskKey> {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, key: &TaskKey) -> bool {
        self.selected.contains(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Replaces the selection with one row. Returns `true` when it changed.
    pub fn select_single(&mut self, key: TaskKey) -> bool {
        let unchanged = self.selected.len() == 1 && self.selected.contains(&key);
        self.selected.clear();
        self.selected.insert(key.clone());
        self.anchor = Some(key);
        !unchanged
    }

    /// Adds or removes one row, keeping the rest.
    pub fn toggle(&mut self, key: TaskKey) -> bool {
        if !self.selected.shift_remove(&key) {
            self.selected.insert(key.clone());
        }
        self.anchor = Some(key);
        true
    }

    /// Selects every visible row between the anchor and `key`, inclusive.
    ///
    /// Without an anchor, or when either end is not visible, this behaves
    /// like [`SelectionState::select_single`].
    pub fn select_range(&mut self, key: TaskKey, visible_rows: &[TaskKey]) -> bool {
        let anchor_position = self
            .anchor
            .as_ref()
            .and_then(|anchor| visible_rows.iter().position(|row| row == anchor));
        let target_position = visible_rows.iter().position(|row| *row == key);
        let (Some(anchor_position), Some(target_position)) = (anchor_position, target_position)
        else {
            return self.select_single(key);
        };

        let (from, to) = if anchor_position <= target_position {
            (anchor_position, target_position)
        } else {
            (target_position, anchor_position)
        };
        let range: IndexSet<TaskKey> = visible_rows[from..=to].iter().cloned().collect();
        if range == self.selected {
            return false;
        }
        self.selected = range;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Drops keys that no longer resolve after the task list changed.
    pub fn retain_known(&mut self, index: &TaskIndex) {
        self.selected
            .retain(|key| index.task_map.contains(key.level, &key.id));
        if self
            .anchor
            .as_ref()
            .is_some_and(|anchor| !index.task_map.contains(anchor.level, &anchor.id))
        {
            self.anchor = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// Rows captured by copy or cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    pub mode: ClipboardMode,
    /// Top-most selected rows; their descendants are in `tasks` too.
    pub roots: Vec<TaskOrEmpty>,
    /// Roots followed by their descendants, in pre-order.
    pub tasks: Vec<TaskOrEmpty>,
}

impl Clipboard {
    /// Captures the selection. Rows nested under another selected row are
    /// carried by that ancestor.
    #[must_use]
    pub fn capture(mode: ClipboardMode, selection: &SelectionState, index: &TaskIndex) -> Self {
        let selected: Vec<&TaskOrEmpty> = selection
            .selected()
            .iter()
            .filter_map(|key| index.task_map.get(key.level, &key.id))
            .collect();

        let roots: Vec<TaskOrEmpty> = selected
            .iter()
            .filter(|row| {
                !selected
                    .iter()
                    .any(|other| check_is_descendant(other, row, &index.task_map))
            })
            .map(|row| (*row).clone())
            .collect();

        let mut tasks = Vec::new();
        for root in &roots {
            tasks.push(root.clone());
            tasks.extend(get_all_descendants(root, &index.child_map, true));
        }
        Self { mode, roots, tasks }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Change action pasting the clipboard under `parent`.
    ///
    /// Copies become `AddChildren` with ids produced by `new_id`; internal
    /// parent and dependency references follow the renamed rows. Cuts
    /// become `MoveInside`. Pasting a cut into its own subtree, or across
    /// comparison levels, yields `None`.
    pub fn paste(
        &self,
        parent: &TaskOrEmpty,
        index: &TaskIndex,
        mut new_id: impl FnMut(&TaskId) -> TaskId,
    ) -> Option<ChangeAction> {
        if self.is_empty() {
            return None;
        }
        let level = parent.comparison_level();
        if self.roots.iter().any(|root| root.comparison_level() != level) {
            return None;
        }

        match self.mode {
            ClipboardMode::Cut => {
                let into_own_subtree = self.roots.iter().any(|root| {
                    root.id() == parent.id() || check_is_descendant(root, parent, &index.task_map)
                });
                if into_own_subtree {
                    return None;
                }
                Some(ChangeAction::MoveInside {
                    parent: parent.clone(),
                    children: self.roots.clone(),
                })
            }
            ClipboardMode::Copy => {
                let renamed: HashMap<TaskId, TaskId> = self
                    .tasks
                    .iter()
                    .map(|row| (row.id().clone(), new_id(row.id())))
                    .collect();
                let root_ids: Vec<&TaskId> = self.roots.iter().map(TaskOrEmpty::id).collect();
                let descendants = self
                    .tasks
                    .iter()
                    .map(|row| {
                        let parent_id = if root_ids.contains(&row.id()) {
                            Some(parent.id().clone())
                        } else {
                            row.parent().map(|id| renamed.get(id).unwrap_or(id).clone())
                        };
                        rename_row(row, &renamed, parent_id)
                    })
                    .collect();
                Some(ChangeAction::AddChildren {
                    parent: parent.clone(),
                    descendants,
                })
            }
        }
    }
}

fn rename_row(
    row: &TaskOrEmpty,
    renamed: &HashMap<TaskId, TaskId>,
    parent: Option<TaskId>,
) -> TaskOrEmpty {
    let rename = |id: &TaskId| renamed.get(id).unwrap_or(id).clone();
    match row {
        TaskOrEmpty::Task(task) => {
            let mut copy = task.clone();
            copy.id = rename(&task.id);
            copy.parent = parent;
            for dependency in &mut copy.dependencies {
                dependency.source_id = rename(&dependency.source_id);
            }
            TaskOrEmpty::Task(copy)
        }
        TaskOrEmpty::Empty(empty) => {
            let mut copy = empty.clone();
            copy.id = rename(&empty.id);
            copy.parent = parent;
            TaskOrEmpty::Empty(copy)
        }
    }
}

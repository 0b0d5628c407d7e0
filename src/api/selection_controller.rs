use crate::core::change_metadata::{ChangeAction, ChangeMetadata};
use crate::core::task::{TaskId, TaskKey};
use crate::error::GanttResult;
use crate::interaction::{Clipboard, ClipboardMode, SelectionState};

use super::{GanttEngine, GanttHandler, PluginEvent};

impl<H: GanttHandler> GanttEngine<H> {
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.interaction.selection()
    }

    pub fn select_task(&mut self, key: TaskKey) {
        let changed = self.interaction.selection_mut().select_single(key);
        self.after_selection_change(changed);
    }

    pub fn toggle_task_selection(&mut self, key: TaskKey) {
        let changed = self.interaction.selection_mut().toggle(key);
        self.after_selection_change(changed);
    }

    /// Shift-click: selects the visible rows between the anchor and `key`.
    pub fn select_task_range(&mut self, key: TaskKey) {
        let visible = self.layout.visible_keys();
        let changed = self.interaction.selection_mut().select_range(key, &visible);
        self.after_selection_change(changed);
    }

    pub fn clear_selection(&mut self) {
        let changed = self.interaction.selection_mut().clear();
        self.after_selection_change(changed);
    }

    fn after_selection_change(&mut self, changed: bool) {
        if !changed {
            return;
        }
        let selected_count = self.interaction.selection().selected().len();
        self.emit_plugin_event(&PluginEvent::SelectionChanged { selected_count });
    }

    /// Captures the selection (with descendants) for a later paste.
    pub fn copy_selection(&mut self) -> bool {
        self.capture_selection(ClipboardMode::Copy)
    }

    pub fn cut_selection(&mut self) -> bool {
        self.capture_selection(ClipboardMode::Cut)
    }

    fn capture_selection(&mut self, mode: ClipboardMode) -> bool {
        let clipboard = Clipboard::capture(mode, self.interaction.selection(), &self.index);
        if clipboard.is_empty() {
            return false;
        }
        self.interaction.set_clipboard(Some(clipboard));
        true
    }

    #[must_use]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.interaction.clipboard()
    }

    /// Builds the paste action under `parent` and resolves its cascade.
    ///
    /// `new_id` names copied rows. A cut is consumed by a successful paste.
    /// `Ok(None)` means nothing to paste or an invalid target.
    pub fn paste_into(
        &mut self,
        parent: &TaskKey,
        new_id: impl FnMut(&TaskId) -> TaskId,
    ) -> GanttResult<Option<(ChangeAction, ChangeMetadata)>> {
        let parent_row = self.index.task(parent.level, &parent.id)?.clone();
        let Some(clipboard) = self.interaction.clipboard() else {
            return Ok(None);
        };
        let mode = clipboard.mode;
        let Some(action) = clipboard.paste(&parent_row, &self.index, new_id) else {
            return Ok(None);
        };
        if mode == ClipboardMode::Cut {
            self.interaction.set_clipboard(None);
        }
        let metadata = self.resolve_change(&action);
        Ok(Some((action, metadata)))
    }
}

pub mod auto_scroll;
pub mod drag;
pub mod relation;
pub mod selection;

use serde::{Deserialize, Serialize};

use crate::core::change_metadata::BarMoveAction;

pub use auto_scroll::{AutoScrollConfig, clamp_scroll, resolve_auto_scroll_delta};
pub use drag::{ChangeInProgress, DragGeometry, DragStep, handle_task_by_x};
pub use relation::{
    RelationHandle, RelationHandleGeometry, RelationHotspot, RelationProposal, RelationState,
    hit_test_relation, relation_hotspots,
};
pub use selection::{Clipboard, ClipboardMode, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Moving,
    ResizingStart,
    ResizingEnd,
    AdjustingProgress,
    DrawingRelation,
}

impl From<BarMoveAction> for InteractionMode {
    fn from(action: BarMoveAction) -> Self {
        match action {
            BarMoveAction::Move => InteractionMode::Moving,
            BarMoveAction::Start => InteractionMode::ResizingStart,
            BarMoveAction::End => InteractionMode::ResizingEnd,
            BarMoveAction::Progress => InteractionMode::AdjustingProgress,
        }
    }
}

/// Scroll offsets of the chart viewport over the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub x: f64,
    pub y: f64,
}

/// All mutable UI state of one chart. At most one gesture is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    gesture: Option<ChangeInProgress>,
    relation: RelationState,
    scroll: ScrollState,
    selection: SelectionState,
    clipboard: Option<Clipboard>,
}

impl InteractionState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if let Some(gesture) = &self.gesture {
            return gesture.action.into();
        }
        if self.relation.is_drawing() {
            return InteractionMode::DrawingRelation;
        }
        InteractionMode::Idle
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gesture.is_some() || self.relation.is_drawing()
    }

    #[must_use]
    pub fn gesture(&self) -> Option<&ChangeInProgress> {
        self.gesture.as_ref()
    }

    pub fn gesture_mut(&mut self) -> Option<&mut ChangeInProgress> {
        self.gesture.as_mut()
    }

    /// Starts a bar gesture; refused while another gesture is active.
    pub fn begin_gesture(&mut self, change: ChangeInProgress) -> bool {
        if self.is_busy() {
            return false;
        }
        self.gesture = Some(change);
        true
    }

    pub fn take_gesture(&mut self) -> Option<ChangeInProgress> {
        self.gesture.take()
    }

    #[must_use]
    pub fn relation(&self) -> &RelationState {
        &self.relation
    }

    /// Starts drawing a relation; refused while another gesture is active.
    pub fn begin_relation(&mut self, from: RelationHandle, start: (f64, f64)) -> bool {
        if self.is_busy() {
            return false;
        }
        self.relation = RelationState::Drawing {
            from,
            start,
            end: start,
        };
        true
    }

    pub fn update_relation_end(&mut self, point: (f64, f64)) {
        if let RelationState::Drawing { end, .. } = &mut self.relation {
            *end = point;
        }
    }

    pub fn take_relation(&mut self) -> RelationState {
        std::mem::take(&mut self.relation)
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: ScrollState) {
        self.scroll = scroll;
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    #[must_use]
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    pub fn set_clipboard(&mut self, clipboard: Option<Clipboard>) {
        self.clipboard = clipboard;
    }

    /// Drops any gesture or relation in progress.
    pub fn cancel(&mut self) -> bool {
        let had_gesture = self.gesture.take().is_some();
        let had_relation = std::mem::take(&mut self.relation).is_drawing();
        had_gesture || had_relation
    }
}

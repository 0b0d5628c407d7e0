use serde::{Deserialize, Serialize};

use crate::core::change_metadata::BarMoveAction;
use crate::core::task::{ComparisonLevel, TaskId};
use crate::core::ViewMode;
use crate::interaction::{InteractionMode, RelationHandle, ScrollState};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub view_mode: ViewMode,
    pub column_width: f64,
    pub content_width: f64,
    pub task_count: usize,
    pub row_count: usize,
    pub interaction_mode: InteractionMode,
    pub scroll: ScrollState,
    pub selected_count: usize,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PluginEvent {
    LayoutRebuilt {
        task_count: usize,
        row_count: usize,
    },
    GestureStarted {
        level: ComparisonLevel,
        task_id: TaskId,
        action: BarMoveAction,
    },
    GestureUpdated {
        level: ComparisonLevel,
        task_id: TaskId,
        action: BarMoveAction,
    },
    GestureCommitted {
        level: ComparisonLevel,
        task_id: TaskId,
        action: BarMoveAction,
    },
    GestureCancelled,
    AutoScrolled {
        scroll_x: f64,
    },
    RelationProposed {
        from: RelationHandle,
        to: RelationHandle,
    },
    SelectionChanged {
        selected_count: usize,
    },
    ScrollChanged {
        x: f64,
        y: f64,
    },
}

/// Observer interface for bounded custom logic.
///
/// Plugins see events and engine context but cannot mutate the engine.
pub trait GanttPlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PluginEvent, context: PluginContext);
}

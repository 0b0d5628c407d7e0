use chrono::NaiveDateTime;

use crate::core::WorkingCalendar;
use crate::core::hierarchy::TaskIndex;
use crate::extensions::GanttPlugin;
use crate::interaction::InteractionState;

use super::{GanttEngineConfig, GanttHandler, GanttLayout};

/// Main orchestration facade consumed by host applications.
///
/// One engine per chart. It owns the current task snapshot, the layout
/// derived from it, all mutable UI state and the host callback handler.
pub struct GanttEngine<H: GanttHandler> {
    pub(super) handler: H,
    pub(super) config: GanttEngineConfig,
    pub(super) index: TaskIndex,
    pub(super) layout: GanttLayout,
    pub(super) interaction: InteractionState,
    pub(super) calendar: Box<dyn WorkingCalendar>,
    pub(super) plugins: Vec<Box<dyn GanttPlugin>>,
    /// Fixed fallback instant for an empty task list; wall clock otherwise.
    pub(super) reference_now: Option<NaiveDateTime>,
}

impl<H: GanttHandler> GanttEngine<H> {
    #[must_use]
    pub fn config(&self) -> &GanttEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &GanttLayout {
        &self.layout
    }

    #[must_use]
    pub fn index(&self) -> &TaskIndex {
        &self.index
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Ids of the attached plugins, in registration order.
    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.plugins.iter().map(|plugin| plugin.id())
    }

    #[must_use]
    pub fn into_handler(self) -> H {
        self.handler
    }
}

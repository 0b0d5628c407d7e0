use chrono::NaiveDateTime;

use crate::core::change_metadata::{
    ChangeAction, ChangeMetadata, resolve_change_metadata, suggest_dependency_fix,
    suggest_parent_fit,
};
use crate::core::hierarchy::TaskIndex;
use crate::core::task::{Task, TaskKey, TaskOrEmpty};
use crate::core::{ViewMode, WorkingCalendar};
use crate::error::{GanttError, GanttResult};

use super::validation::validate_config;
use super::{GanttEngine, GanttEngineConfig, GanttHandler, GanttLayout, PluginEvent};

impl<H: GanttHandler> GanttEngine<H> {
    #[must_use]
    pub fn tasks(&self) -> &[TaskOrEmpty] {
        &self.index.tasks
    }

    /// Replaces the task snapshot and rebuilds every derived map.
    pub fn set_tasks(&mut self, tasks: Vec<TaskOrEmpty>) {
        self.index = TaskIndex::build(tasks);
        self.interaction.selection_mut().retain_known(&self.index);
        self.rebuild_layout();
    }

    pub fn set_config(&mut self, config: GanttEngineConfig) -> GanttResult<()> {
        validate_config(&config)?;
        self.config = config;
        self.rebuild_layout();
        Ok(())
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if self.config.view_mode == view_mode {
            return;
        }
        self.config.view_mode = view_mode;
        self.rebuild_layout();
    }

    /// Holiday predicate used when working dates are enforced.
    pub fn set_calendar(&mut self, calendar: Box<dyn WorkingCalendar>) {
        self.calendar = calendar;
    }

    #[must_use]
    pub fn calendar(&self) -> &dyn WorkingCalendar {
        self.calendar.as_ref()
    }

    /// Dated task by identity.
    pub fn task(&self, key: &TaskKey) -> GanttResult<&Task> {
        match self.index.task(key.level, &key.id)? {
            TaskOrEmpty::Task(task) => Ok(task),
            TaskOrEmpty::Empty(_) => Err(GanttError::InvalidData(format!(
                "row `{}` at level {} is a placeholder without dates",
                key.id, key.level
            ))),
        }
    }

    /// Dependents, indexes and cascading suggestions for a proposed edit.
    #[must_use]
    pub fn resolve_change(&self, action: &ChangeAction) -> ChangeMetadata {
        resolve_change_metadata(
            action,
            &self.index,
            &self.layout.graph,
            self.config.change_options(),
        )
    }

    pub fn suggest_dependency_fix(
        &self,
        key: &TaskKey,
    ) -> GanttResult<Option<(NaiveDateTime, NaiveDateTime)>> {
        let task = self.task(key)?;
        Ok(suggest_dependency_fix(task, &self.layout.graph))
    }

    pub fn suggest_parent_fit(
        &self,
        key: &TaskKey,
    ) -> GanttResult<Option<(NaiveDateTime, NaiveDateTime)>> {
        let task = self.task(key)?;
        Ok(suggest_parent_fit(task, &self.index))
    }

    pub(super) fn rebuild_layout(&mut self) {
        self.layout = GanttLayout::build(&self.index, &self.config, self.now());
        let event = PluginEvent::LayoutRebuilt {
            task_count: self.index.tasks.len(),
            row_count: self.layout.rows.row_count(),
        };
        self.emit_plugin_event(&event);
    }
}

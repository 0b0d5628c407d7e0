use chrono::{Local, NaiveDateTime};

use crate::core::WeekendCalendar;
use crate::core::hierarchy::TaskIndex;
use crate::core::task::TaskOrEmpty;
use crate::error::GanttResult;
use crate::interaction::InteractionState;

use super::validation::validate_config;
use super::{GanttEngine, GanttEngineConfig, GanttHandler, GanttLayout};

impl<H: GanttHandler> GanttEngine<H> {
    /// Creates an engine over an initial task list.
    pub fn new(handler: H, config: GanttEngineConfig, tasks: Vec<TaskOrEmpty>) -> GanttResult<Self> {
        validate_config(&config)?;
        let index = TaskIndex::build(tasks);
        let layout = GanttLayout::build(&index, &config, Local::now().naive_local());
        Ok(Self {
            handler,
            config,
            index,
            layout,
            interaction: InteractionState::default(),
            calendar: Box::new(WeekendCalendar),
            plugins: Vec::new(),
            reference_now: None,
        })
    }

    /// Pins the instant used as range fallback when no task has dates.
    #[must_use]
    pub fn with_reference_now(mut self, now: NaiveDateTime) -> Self {
        self.reference_now = Some(now);
        self.layout = GanttLayout::build(&self.index, &self.config, now);
        self
    }

    pub(super) fn now(&self) -> NaiveDateTime {
        self.reference_now
            .unwrap_or_else(|| Local::now().naive_local())
    }
}

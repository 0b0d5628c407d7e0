use serde::{Deserialize, Serialize};

use crate::core::ViewMode;
use crate::core::change_metadata::ChangeOptions;
use crate::error::{GanttError, GanttResult};
use crate::interaction::AutoScrollConfig;

/// Public engine bootstrap configuration.
///
/// Serializable so host applications can persist chart setup next to their
/// own settings. Every field except the view mode has a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GanttEngineConfig {
    pub view_mode: ViewMode,
    #[serde(default = "default_column_width")]
    pub column_width: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Bar height inside a row.
    #[serde(default = "default_task_height")]
    pub task_height: f64,
    #[serde(default = "default_comparison_levels")]
    pub comparison_levels: u32,
    /// Drag quantum in milliseconds.
    #[serde(default = "default_time_step_ms")]
    pub time_step_ms: i64,
    /// Extra units shown before the earliest task.
    #[serde(default = "default_leading_units")]
    pub leading_units: u32,
    #[serde(default)]
    pub rtl: bool,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "default_handle_width")]
    pub handle_width: f64,
    #[serde(default = "default_relation_circle_offset")]
    pub relation_circle_offset: f64,
    #[serde(default = "default_relation_circle_radius")]
    pub relation_circle_radius: f64,
    #[serde(default)]
    pub auto_scroll: AutoScrollConfig,
    #[serde(default = "default_true")]
    pub check_dependency_warnings: bool,
    #[serde(default)]
    pub show_critical_path: bool,
    /// Snap dragged dates to view-mode units on release.
    #[serde(default)]
    pub round_dates: bool,
    /// Move dragged dates off holidays on release.
    #[serde(default)]
    pub working_dates_only: bool,
    #[serde(default = "default_true")]
    pub move_children_with_parent: bool,
    #[serde(default = "default_true")]
    pub update_parents_on_change: bool,
    /// Propose relations between a task and its own ancestor/descendant.
    #[serde(default)]
    pub allow_hierarchy_relations: bool,
}

impl GanttEngineConfig {
    #[must_use]
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            column_width: default_column_width(),
            row_height: default_row_height(),
            task_height: default_task_height(),
            comparison_levels: default_comparison_levels(),
            time_step_ms: default_time_step_ms(),
            leading_units: default_leading_units(),
            rtl: false,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            handle_width: default_handle_width(),
            relation_circle_offset: default_relation_circle_offset(),
            relation_circle_radius: default_relation_circle_radius(),
            auto_scroll: AutoScrollConfig::default(),
            check_dependency_warnings: true,
            show_critical_path: false,
            round_dates: false,
            working_dates_only: false,
            move_children_with_parent: true,
            update_parents_on_change: true,
            allow_hierarchy_relations: false,
        }
    }

    #[must_use]
    pub fn with_column_width(mut self, column_width: f64) -> Self {
        self.column_width = column_width;
        self
    }

    #[must_use]
    pub fn with_row_geometry(mut self, row_height: f64, task_height: f64) -> Self {
        self.row_height = row_height;
        self.task_height = task_height;
        self
    }

    #[must_use]
    pub fn with_comparison_levels(mut self, comparison_levels: u32) -> Self {
        self.comparison_levels = comparison_levels;
        self
    }

    #[must_use]
    pub fn with_time_step_ms(mut self, time_step_ms: i64) -> Self {
        self.time_step_ms = time_step_ms;
        self
    }

    #[must_use]
    pub fn with_leading_units(mut self, leading_units: u32) -> Self {
        self.leading_units = leading_units;
        self
    }

    #[must_use]
    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub fn with_auto_scroll(mut self, auto_scroll: AutoScrollConfig) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }

    #[must_use]
    pub fn with_critical_path(mut self, enabled: bool) -> Self {
        self.show_critical_path = enabled;
        self
    }

    #[must_use]
    pub fn with_dependency_warnings(mut self, enabled: bool) -> Self {
        self.check_dependency_warnings = enabled;
        self
    }

    #[must_use]
    pub fn with_round_dates(mut self, enabled: bool) -> Self {
        self.round_dates = enabled;
        self
    }

    #[must_use]
    pub fn with_working_dates_only(mut self, enabled: bool) -> Self {
        self.working_dates_only = enabled;
        self
    }

    #[must_use]
    pub fn with_change_options(mut self, options: ChangeOptions) -> Self {
        self.move_children_with_parent = options.move_children_with_parent;
        self.update_parents_on_change = options.update_parents_on_change;
        self
    }

    #[must_use]
    pub fn with_hierarchy_relations(mut self, allowed: bool) -> Self {
        self.allow_hierarchy_relations = allowed;
        self
    }

    #[must_use]
    pub fn change_options(&self) -> ChangeOptions {
        ChangeOptions {
            move_children_with_parent: self.move_children_with_parent,
            update_parents_on_change: self.update_parents_on_change,
        }
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> GanttResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| GanttError::InvalidData(format!("failed to serialize config: {e}")))
    }

    pub fn from_json_str(input: &str) -> GanttResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| GanttError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_column_width() -> f64 {
    60.0
}

fn default_row_height() -> f64 {
    50.0
}

fn default_task_height() -> f64 {
    30.0
}

fn default_comparison_levels() -> u32 {
    1
}

fn default_time_step_ms() -> i64 {
    300_000
}

fn default_leading_units() -> u32 {
    1
}

fn default_viewport_width() -> f64 {
    1000.0
}

fn default_viewport_height() -> f64 {
    600.0
}

fn default_handle_width() -> f64 {
    8.0
}

fn default_relation_circle_offset() -> f64 {
    10.0
}

fn default_relation_circle_radius() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

use crate::error::{GanttError, GanttResult};

use super::{EngineSnapshot, GanttEngine, GanttHandler};

impl<H: GanttHandler> GanttEngine<H> {
    /// Builds a deterministic snapshot useful for regression tests.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let layout = &self.layout;
        EngineSnapshot {
            view_mode: layout.grid.view_mode(),
            grid_start: layout.grid.start(),
            unit_count: layout.grid.unit_count(),
            dates: layout.grid.dates().to_vec(),
            column_width: layout.space.column_width,
            content_width: layout.content_width(),
            rows: layout.rows.entries().clone(),
            coordinates: layout.coordinates.clone(),
            critical_paths: layout.critical_paths.clone(),
            dependency_warnings: layout.graph.warnings.clone(),
            child_out_of_parent_warnings: layout.child_out_of_parent_warnings.clone(),
            scroll: self.interaction.scroll(),
            interaction_mode: self.interaction.mode(),
            selected: self
                .interaction
                .selection()
                .selected()
                .iter()
                .cloned()
                .collect(),
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> GanttResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| GanttError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}

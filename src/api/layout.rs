use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::core::aggregates::{
    ChildOutOfParentWarnings, CriticalPaths, get_child_out_of_parent_warnings, get_critical_path,
};
use crate::core::calendar_labels::{CalendarHeader, calendar_header};
use crate::core::coordinates::{
    ArrowAnchors, CoordinateSpace, CoordinatesMap, RowGeometry, build_coordinates,
    dependency_arrow_anchors,
};
use crate::core::dependency::{DependencyGraph, build_dependency_and_dependent_maps};
use crate::core::hierarchy::{
    CollapsedSet, NestedIndex, RowIndexMap, TaskIndex, build_nested_index_map,
    build_visible_row_index_map, collapsed_set_from_tasks, visible_tasks,
};
use crate::core::level_map::LevelMap;
use crate::core::task::{TaskKey, TaskOrEmpty};
use crate::core::time_grid::compute_range_at;
use crate::core::TimeGrid;

use super::GanttEngineConfig;

/// Everything the rendering layer reads, derived from one task snapshot
/// and one config. Never patched; rebuilt on every input change.
#[derive(Debug, Clone)]
pub struct GanttLayout {
    pub grid: TimeGrid,
    pub space: CoordinateSpace,
    pub geometry: RowGeometry,
    pub header: CalendarHeader,
    pub collapsed: CollapsedSet,
    pub rows: RowIndexMap,
    /// Visible rows in display order.
    pub visible: Vec<TaskOrEmpty>,
    pub nested: LevelMap<NestedIndex>,
    pub graph: DependencyGraph,
    pub tasks_with_dependency_warnings: HashSet<TaskKey>,
    pub child_out_of_parent_warnings: ChildOutOfParentWarnings,
    pub critical_paths: CriticalPaths,
    pub coordinates: CoordinatesMap,
    pub arrows: Vec<ArrowAnchors>,
}

impl GanttLayout {
    #[must_use]
    pub fn build(index: &TaskIndex, config: &GanttEngineConfig, now: NaiveDateTime) -> Self {
        let collapsed = collapsed_set_from_tasks(&index.sorted);
        let rows = build_visible_row_index_map(&index.sorted, &collapsed);
        let visible = visible_tasks(&index.sorted, &collapsed);
        let nested = build_nested_index_map(&index.sorted);

        // Margins feed the critical path, so they are computed for either.
        let check_margins = config.check_dependency_warnings || config.show_critical_path;
        let graph =
            build_dependency_and_dependent_maps(&index.tasks, &index.task_map, check_margins);
        let tasks_with_dependency_warnings = if config.check_dependency_warnings {
            graph.tasks_with_warnings()
        } else {
            HashSet::new()
        };
        let child_out_of_parent_warnings =
            get_child_out_of_parent_warnings(&index.tasks, &index.child_map);
        let critical_paths = if config.show_critical_path {
            get_critical_path(&index.root_map, &index.child_map, &index.task_map, &graph)
        } else {
            CriticalPaths::new()
        };

        let (start, unit_count) =
            compute_range_at(&index.tasks, config.view_mode, config.leading_units, now);
        let grid = TimeGrid::new(start, unit_count, config.view_mode);
        let header = calendar_header(&grid);
        let space = CoordinateSpace::for_grid(&grid, config.column_width, config.rtl);
        let geometry = RowGeometry {
            row_height: config.row_height,
            task_height: config.task_height,
            comparison_levels: config.comparison_levels,
        };
        let coordinates = build_coordinates(&visible, &rows, &space, geometry);
        let arrows =
            dependency_arrow_anchors(&graph, &coordinates, config.task_height, config.rtl);

        debug!(
            tasks = index.tasks.len(),
            rows = rows.row_count(),
            arrows = arrows.len(),
            view_mode = %config.view_mode,
            "rebuilt gantt layout"
        );

        Self {
            grid,
            space,
            geometry,
            header,
            collapsed,
            rows,
            visible,
            nested,
            graph,
            tasks_with_dependency_warnings,
            child_out_of_parent_warnings,
            critical_paths,
            coordinates,
            arrows,
        }
    }

    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.space.content_width
    }

    #[must_use]
    pub fn content_height(&self) -> f64 {
        self.rows.row_count() as f64 * self.geometry.full_row_height()
    }

    /// Visible row identities in display order.
    #[must_use]
    pub fn visible_keys(&self) -> Vec<TaskKey> {
        self.visible.iter().map(TaskOrEmpty::key).collect()
    }
}

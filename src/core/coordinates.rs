use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::dependency::DependencyGraph;
use crate::core::hierarchy::RowIndexMap;
use crate::core::level_map::LevelMap;
use crate::core::primitives::{add_millis_f64, millis_between};
use crate::core::task::{ComparisonLevel, RelationTarget, Task, TaskId, TaskOrEmpty};
use crate::core::{TimeGrid, ViewMode};
use crate::error::GanttResult;

/// Horizontal mapping between grid time and content pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSpace {
    pub start: NaiveDateTime,
    pub view_mode: ViewMode,
    pub column_width: f64,
    pub rtl: bool,
    /// Full content width; the mirror axis in RTL mode.
    pub content_width: f64,
}

impl CoordinateSpace {
    #[must_use]
    pub fn for_grid(grid: &TimeGrid, column_width: f64, rtl: bool) -> Self {
        Self {
            start: grid.start(),
            view_mode: grid.view_mode(),
            column_width,
            rtl,
            content_width: grid.content_width(column_width),
        }
    }

    /// Unit index plus the fractional position inside the unit.
    #[must_use]
    pub fn date_to_x(&self, date: NaiveDateTime) -> f64 {
        let ltr = self.date_to_ltr_x(date);
        if self.rtl { self.content_width - ltr } else { ltr }
    }

    /// Exact inverse of [`CoordinateSpace::date_to_x`], up to millisecond
    /// rounding.
    #[must_use]
    pub fn x_to_date(&self, x: f64) -> NaiveDateTime {
        let ltr = if self.rtl { self.content_width - x } else { x };
        let columns = ltr / self.column_width;
        let index = columns.floor();
        let fraction = columns - index;
        let unit_start = self.view_mode.add_units(self.start, index as i64);
        let unit_end = self.view_mode.add_units(unit_start, 1);
        add_millis_f64(
            unit_start,
            fraction * millis_between(unit_start, unit_end) as f64,
        )
    }

    fn date_to_ltr_x(&self, date: NaiveDateTime) -> f64 {
        let index = self.view_mode.containing_unit_index(date, self.start);
        let unit_start = self.view_mode.add_units(self.start, index);
        let unit_end = self.view_mode.add_units(self.start, index + 1);
        let unit_ms = millis_between(unit_start, unit_end) as f64;
        let fraction = if unit_ms > 0.0 {
            millis_between(unit_start, date) as f64 / unit_ms
        } else {
            0.0
        };
        (index as f64 + fraction) * self.column_width
    }

    /// Pixels covered by one `time_step_ms`, measured on the first grid unit.
    #[must_use]
    pub fn x_step(&self, time_step_ms: i64) -> f64 {
        let unit_ms = millis_between(self.start, self.view_mode.add_units(self.start, 1)) as f64;
        if unit_ms <= 0.0 {
            return self.column_width;
        }
        time_step_ms as f64 * self.column_width / unit_ms
    }
}

/// Shifts `task_date` by the pixel distance `x - task_x`, expressed in
/// time steps.
///
/// Naive wall-clock instants carry no UTC offset, so no daylight-saving
/// correction is needed between the reference and the result.
#[must_use]
pub fn date_by_x(
    x: f64,
    task_x: f64,
    task_date: NaiveDateTime,
    x_step: f64,
    time_step_ms: i64,
) -> NaiveDateTime {
    if x_step == 0.0 {
        return task_date;
    }
    add_millis_f64(task_date, (x - task_x) / x_step * time_step_ms as f64)
}

/// Vertical layout of rows and comparison levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowGeometry {
    pub row_height: f64,
    pub task_height: f64,
    pub comparison_levels: u32,
}

impl RowGeometry {
    /// Height of one row band holding every comparison level.
    #[must_use]
    pub fn full_row_height(self) -> f64 {
        self.row_height * f64::from(self.comparison_levels.max(1))
    }

    #[must_use]
    pub fn task_y_offset(self) -> f64 {
        ((self.row_height - self.task_height) / 2.0).max(0.0)
    }

    #[must_use]
    pub fn row_index_to_y(self, row_index: usize, level: ComparisonLevel) -> f64 {
        row_index as f64 * self.full_row_height()
            + self.row_height * f64::from(level.saturating_sub(1))
            + self.task_y_offset()
    }

    /// Row band under a content y, if any.
    #[must_use]
    pub fn y_to_row_index(self, y: f64) -> Option<usize> {
        if y < 0.0 {
            return None;
        }
        Some((y / self.full_row_height()).floor() as usize)
    }
}

/// Screen geometry of one rendered task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskCoordinates {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub progress_x: f64,
    pub progress_width: f64,
}

impl TaskCoordinates {
    #[must_use]
    pub fn width(self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }
}

pub type CoordinatesMap = LevelMap<TaskCoordinates>;

/// Progress bar `(width, x)` inside `[x1, x2]`; RTL fills from the right.
#[must_use]
pub fn progress_with_by_params(x1: f64, x2: f64, progress: u8, rtl: bool) -> (f64, f64) {
    let progress_width = ((x2 - x1) * f64::from(progress) * 0.01).max(0.0);
    let progress_x = if rtl { x2 - progress_width } else { x1 };
    (progress_width, progress_x)
}

#[must_use]
pub fn count_task_coordinates(
    task: &Task,
    row_index: usize,
    space: &CoordinateSpace,
    geometry: RowGeometry,
) -> TaskCoordinates {
    let (x1, x2) = if space.rtl {
        (space.date_to_x(task.end), space.date_to_x(task.start))
    } else {
        (space.date_to_x(task.start), space.date_to_x(task.end))
    };
    let (progress_width, progress_x) = progress_with_by_params(x1, x2, task.progress, space.rtl);
    let y = geometry.row_index_to_y(row_index, task.comparison_level);

    if task.is_milestone() {
        let half = geometry.task_height * 0.5;
        TaskCoordinates {
            x1: x1 - half,
            x2: x2 + half,
            y,
            progress_x,
            progress_width,
        }
    } else {
        TaskCoordinates {
            x1,
            x2,
            y,
            progress_x,
            progress_width,
        }
    }
}

/// Coordinates for every visible dated task.
pub fn build_coordinates(
    tasks: &[TaskOrEmpty],
    rows: &RowIndexMap,
    space: &CoordinateSpace,
    geometry: RowGeometry,
) -> CoordinatesMap {
    let visible: Vec<(&Task, usize)> = tasks
        .iter()
        .filter_map(TaskOrEmpty::as_task)
        .filter_map(|task| {
            rows.get(task.comparison_level, &task.id)
                .map(|row| (task, row))
        })
        .collect();

    let projected = project_all(&visible, space, geometry);

    let mut map = CoordinatesMap::new();
    for level in rows.entries().levels() {
        map.ensure_level(level);
    }
    for ((task, _), coordinates) in visible.iter().zip(projected) {
        map.insert(task.comparison_level, task.id.clone(), coordinates);
    }
    map
}

#[cfg(not(feature = "parallel-projection"))]
fn project_all(
    visible: &[(&Task, usize)],
    space: &CoordinateSpace,
    geometry: RowGeometry,
) -> Vec<TaskCoordinates> {
    visible
        .iter()
        .map(|(task, row)| count_task_coordinates(task, *row, space, geometry))
        .collect()
}

#[cfg(feature = "parallel-projection")]
fn project_all(
    visible: &[(&Task, usize)],
    space: &CoordinateSpace,
    geometry: RowGeometry,
) -> Vec<TaskCoordinates> {
    use rayon::prelude::*;

    visible
        .par_iter()
        .map(|(task, row)| count_task_coordinates(task, *row, space, geometry))
        .collect()
}

/// Anchor x of a task edge, honoring the RTL swap of `x1`/`x2`.
#[must_use]
pub fn anchor_x(coordinates: TaskCoordinates, target: RelationTarget, rtl: bool) -> f64 {
    match (target, rtl) {
        (RelationTarget::StartOfTask, false) | (RelationTarget::EndOfTask, true) => coordinates.x1,
        (RelationTarget::EndOfTask, false) | (RelationTarget::StartOfTask, true) => coordinates.x2,
    }
}

/// Endpoints of one dependency arrow between two rendered tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowAnchors {
    pub level: ComparisonLevel,
    pub source_id: TaskId,
    pub dependent_id: TaskId,
    pub source_target: RelationTarget,
    pub own_target: RelationTarget,
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Arrow endpoints for every edge whose both ends are laid out. Edges to
/// collapsed rows are skipped.
#[must_use]
pub fn dependency_arrow_anchors(
    graph: &DependencyGraph,
    coordinates: &CoordinatesMap,
    task_height: f64,
    rtl: bool,
) -> Vec<ArrowAnchors> {
    let half = task_height / 2.0;
    let mut arrows = Vec::new();
    for (level, dependent_id, edges) in graph.dependencies.iter() {
        let Some(dependent) = coordinates.get(level, dependent_id).copied() else {
            continue;
        };
        for edge in edges {
            let Some(source) = coordinates.get(level, &edge.source.id).copied() else {
                continue;
            };
            arrows.push(ArrowAnchors {
                level,
                source_id: edge.source.id.clone(),
                dependent_id: dependent_id.clone(),
                source_target: edge.source_target,
                own_target: edge.own_target,
                from: (anchor_x(source, edge.source_target, rtl), source.y + half),
                to: (anchor_x(dependent, edge.own_target, rtl), dependent.y + half),
            });
        }
    }
    arrows
}

/// Coordinates of a task that must have been laid out.
pub fn required_coordinates(
    coordinates: &CoordinatesMap,
    level: ComparisonLevel,
    id: &TaskId,
) -> GanttResult<TaskCoordinates> {
    coordinates.try_get(level, id).copied().inspect_err(|err| {
        warn!(level, task_id = %id, error = %err, "coordinates requested for a row without layout");
    })
}

use serde::{Deserialize, Serialize};

use crate::core::change_metadata::BarMoveAction;
use crate::core::coordinates::{TaskCoordinates, date_by_x, progress_with_by_params};
use crate::core::task::Task;

/// Pixel parameters shared by every tick of a bar gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragGeometry {
    /// Pixels covered by one `time_step_ms`.
    pub x_step: f64,
    pub time_step_ms: i64,
    /// Resize handles keep the bar at least two handles wide.
    pub handle_width: f64,
    pub rtl: bool,
}

/// Transient state of one bar gesture, discarded on commit or cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeInProgress {
    pub action: BarMoveAction,
    pub original_task: Task,
    pub changed_task: Task,
    pub original_coordinates: TaskCoordinates,
    pub coordinates: TaskCoordinates,
    /// Pointer distance from `x1` at gesture start, in content space.
    pub pointer_offset: f64,
    /// Latest pointer x relative to the viewport.
    pub viewport_x: f64,
}

impl ChangeInProgress {
    #[must_use]
    pub fn begin(
        action: BarMoveAction,
        task: Task,
        coordinates: TaskCoordinates,
        content_x: f64,
        viewport_x: f64,
    ) -> Self {
        Self {
            action,
            original_task: task.clone(),
            changed_task: task,
            original_coordinates: coordinates,
            coordinates,
            pointer_offset: content_x - coordinates.x1,
            viewport_x,
        }
    }

    /// Net change against the task captured at gesture start.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changed_task.start != self.original_task.start
            || self.changed_task.end != self.original_task.end
            || self.changed_task.progress != self.original_task.progress
    }
}

/// Result of one pointer tick that actually moved the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragStep {
    pub task: Task,
    pub coordinates: TaskCoordinates,
}

/// Progress percent for a pointer at `x` inside the bar.
#[must_use]
pub fn progress_by_x(x: f64, coordinates: TaskCoordinates) -> u8 {
    let TaskCoordinates { x1, x2, .. } = coordinates;
    if x >= x2 {
        100
    } else if x <= x1 || x2 <= x1 {
        0
    } else {
        ((x - x1) * 100.0 / (x2 - x1)).round().clamp(0.0, 100.0) as u8
    }
}

/// Progress percent when the bar fills from the right.
#[must_use]
pub fn progress_by_x_rtl(x: f64, coordinates: TaskCoordinates) -> u8 {
    let TaskCoordinates { x1, x2, .. } = coordinates;
    if x <= x1 {
        100
    } else if x >= x2 || x2 <= x1 {
        0
    } else {
        ((x2 - x) * 100.0 / (x2 - x1)).round().clamp(0.0, 100.0) as u8
    }
}

/// New left edge, quantized by `x_step` and kept two handles before `x2`.
#[must_use]
pub fn start_by_x(x: f64, x_step: f64, coordinates: TaskCoordinates, handle_width: f64) -> f64 {
    let limit = coordinates.x2 - handle_width * 2.0;
    if x >= limit {
        return limit;
    }
    let steps = ((x - coordinates.x1) / x_step).round();
    coordinates.x1 + steps * x_step
}

/// New right edge, quantized by `x_step` and kept two handles after `x1`.
#[must_use]
pub fn end_by_x(x: f64, x_step: f64, coordinates: TaskCoordinates, handle_width: f64) -> f64 {
    let limit = coordinates.x1 + handle_width * 2.0;
    if x <= limit {
        return limit;
    }
    let steps = ((x - coordinates.x2) / x_step).round();
    coordinates.x2 + steps * x_step
}

/// Both edges shifted by the same whole number of steps.
#[must_use]
pub fn move_by_x(x: f64, x_step: f64, coordinates: TaskCoordinates) -> (f64, f64) {
    let steps = ((x - coordinates.x1) / x_step).round();
    let shift = steps * x_step;
    (coordinates.x1 + shift, coordinates.x2 + shift)
}

/// Applies the pointer at `content_x` to the gesture.
///
/// Returns `None` when the quantized result equals the previous tick.
#[must_use]
pub fn handle_task_by_x(
    content_x: f64,
    change: &ChangeInProgress,
    geometry: DragGeometry,
) -> Option<DragStep> {
    if !geometry.x_step.is_finite() || geometry.x_step <= 0.0 || !content_x.is_finite() {
        return None;
    }

    let previous = change.coordinates;
    let mut coordinates = previous;
    let mut task = change.changed_task.clone();
    // Moving right is later in time in LTR and earlier in RTL.
    let shift_date = |date, from_x: f64, to_x: f64| {
        if geometry.rtl {
            date_by_x(from_x, to_x, date, geometry.x_step, geometry.time_step_ms)
        } else {
            date_by_x(to_x, from_x, date, geometry.x_step, geometry.time_step_ms)
        }
    };

    match change.action {
        BarMoveAction::Progress => {
            let progress = if geometry.rtl {
                progress_by_x_rtl(content_x, previous)
            } else {
                progress_by_x(content_x, previous)
            };
            if progress == task.progress {
                return None;
            }
            task.progress = progress;
        }
        BarMoveAction::Start if geometry.rtl => {
            let x2 = end_by_x(content_x, geometry.x_step, previous, geometry.handle_width);
            if x2 == previous.x2 {
                return None;
            }
            task.start = shift_date(task.start, previous.x2, x2);
            coordinates.x2 = x2;
        }
        BarMoveAction::Start => {
            let x1 = start_by_x(content_x, geometry.x_step, previous, geometry.handle_width);
            if x1 == previous.x1 {
                return None;
            }
            task.start = shift_date(task.start, previous.x1, x1);
            coordinates.x1 = x1;
        }
        BarMoveAction::End if geometry.rtl => {
            let x1 = start_by_x(content_x, geometry.x_step, previous, geometry.handle_width);
            if x1 == previous.x1 {
                return None;
            }
            task.end = shift_date(task.end, previous.x1, x1);
            coordinates.x1 = x1;
        }
        BarMoveAction::End => {
            let x2 = end_by_x(content_x, geometry.x_step, previous, geometry.handle_width);
            if x2 == previous.x2 {
                return None;
            }
            task.end = shift_date(task.end, previous.x2, x2);
            coordinates.x2 = x2;
        }
        BarMoveAction::Move => {
            let (x1, x2) = move_by_x(content_x - change.pointer_offset, geometry.x_step, previous);
            if x1 == previous.x1 {
                return None;
            }
            task.start = shift_date(task.start, previous.x1, x1);
            task.end = if task.is_milestone() {
                task.start
            } else {
                shift_date(task.end, previous.x1, x1)
            };
            coordinates.x1 = x1;
            coordinates.x2 = x2;
        }
    }

    let (progress_width, progress_x) =
        progress_with_by_params(coordinates.x1, coordinates.x2, task.progress, geometry.rtl);
    coordinates.progress_width = progress_width;
    coordinates.progress_x = progress_x;
    Some(DragStep { task, coordinates })
}

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::ViewMode;
use crate::core::task::TaskOrEmpty;

/// Visible timeline range and its ordered tick sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    view_mode: ViewMode,
    start: NaiveDateTime,
    unit_count: i64,
    dates: Vec<NaiveDateTime>,
}

impl TimeGrid {
    /// Builds the grid for the given tasks, falling back to "now" when the
    /// list has no dated task.
    #[must_use]
    pub fn for_tasks(tasks: &[TaskOrEmpty], view_mode: ViewMode, leading_units: u32) -> Self {
        let (start, unit_count) = compute_range(tasks, view_mode, leading_units);
        Self::new(start, unit_count, view_mode)
    }

    #[must_use]
    pub fn new(start: NaiveDateTime, unit_count: i64, view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            start,
            unit_count,
            dates: seed_dates(start, unit_count, view_mode),
        }
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.unit_count
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    /// Last tick of the grid.
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.dates.last().copied().unwrap_or(self.start)
    }

    /// Full content width in pixels: one column per tick.
    #[must_use]
    pub fn content_width(&self, column_width: f64) -> f64 {
        self.dates.len() as f64 * column_width
    }
}

/// Computes the view-mode aligned range start and its length in units.
///
/// Uses the local wall clock as fallback when no task carries dates.
#[must_use]
pub fn compute_range(
    tasks: &[TaskOrEmpty],
    view_mode: ViewMode,
    leading_units: u32,
) -> (NaiveDateTime, i64) {
    compute_range_at(tasks, view_mode, leading_units, Local::now().naive_local())
}

/// Same as [`compute_range`] with an explicit fallback instant.
#[must_use]
pub fn compute_range_at(
    tasks: &[TaskOrEmpty],
    view_mode: ViewMode,
    leading_units: u32,
    now: NaiveDateTime,
) -> (NaiveDateTime, i64) {
    let mut bounds: Option<(NaiveDateTime, NaiveDateTime)> = None;
    for task in tasks.iter().filter_map(TaskOrEmpty::as_task) {
        bounds = Some(match bounds {
            None => (task.start, task.end),
            Some((min, max)) => (min.min(task.start), max.max(task.end)),
        });
    }

    let Some((min, max)) = bounds else {
        return (now, 2);
    };

    let aligned_start = match view_mode {
        ViewMode::Hour => ViewMode::Hour.start_of_unit(min),
        ViewMode::QuarterDay | ViewMode::HalfDay | ViewMode::Day => {
            ViewMode::Day.start_of_unit(min)
        }
        mode => mode.start_of_unit(min),
    };
    let start = view_mode.sub_units(aligned_start, i64::from(leading_units));

    let max_day = ViewMode::Day.start_of_unit(max);
    let end = match view_mode {
        ViewMode::Year | ViewMode::Month => {
            ViewMode::Year.add_units(ViewMode::Year.start_of_unit(max), 1)
        }
        ViewMode::Week => ViewMode::Month.add_units(max_day, 1),
        ViewMode::Day => max_day + Duration::days(19),
        ViewMode::HalfDay => max_day + Duration::hours(108),
        ViewMode::QuarterDay => max_day + Duration::hours(66),
        ViewMode::Hour => max_day + Duration::days(1),
    };

    let unit_count = view_mode.diff_units(end, start).max(0);
    debug!(
        view_mode = %view_mode,
        start = %start,
        unit_count,
        "computed timeline range"
    );
    (start, unit_count)
}

/// `unit_count + 1` ticks, each one view-mode unit after the previous.
#[must_use]
pub fn seed_dates(start: NaiveDateTime, unit_count: i64, view_mode: ViewMode) -> Vec<NaiveDateTime> {
    let count = usize::try_from(unit_count.max(0)).unwrap_or(0);
    let mut dates = Vec::with_capacity(count + 1);
    let mut current = start;
    dates.push(current);
    for _ in 0..count {
        current = view_mode.add_units(current, 1);
        dates.push(current);
    }
    dates
}

/// Ticks from `start` stepping one unit at a time while not past `end`.
#[must_use]
pub fn seed_dates_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    view_mode: ViewMode,
) -> Vec<NaiveDateTime> {
    let mut dates = vec![start];
    let mut current = start;
    loop {
        let next = view_mode.add_units(current, 1);
        if next > end || next <= current {
            break;
        }
        dates.push(next);
        current = next;
    }
    dates
}

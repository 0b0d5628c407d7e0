use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ViewMode;
use crate::core::change_metadata::BarMoveAction;
use crate::core::primitives::{add_millis, millis_between};
use crate::core::task::{Task, TaskKind};

/// Upper bound on single-unit steps when scanning for a working date.
pub const MAX_CALENDAR_SCAN_STEPS: usize = 10_000;

/// Holiday predicate plus the working-date search built on it.
pub trait WorkingCalendar {
    fn is_holiday(&self, date: NaiveDateTime) -> bool;

    /// First working unit start after the unit containing `date`.
    fn next_working_date(&self, date: NaiveDateTime, view_mode: ViewMode) -> NaiveDateTime {
        scan_working_date(self, date, view_mode, 1)
    }

    /// Last working unit start before the unit containing `date`.
    fn previous_working_date(&self, date: NaiveDateTime, view_mode: ViewMode) -> NaiveDateTime {
        scan_working_date(self, date, view_mode, -1)
    }
}

impl<F> WorkingCalendar for F
where
    F: Fn(NaiveDateTime) -> bool,
{
    fn is_holiday(&self, date: NaiveDateTime) -> bool {
        self(date)
    }
}

/// Saturdays and Sundays are holidays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendCalendar;

impl WorkingCalendar for WeekendCalendar {
    fn is_holiday(&self, date: NaiveDateTime) -> bool {
        is_weekend(date.date())
    }
}

/// Optional weekends plus an explicit set of holiday dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    pub weekends_off: bool,
    pub holidays: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    #[must_use]
    pub fn new(weekends_off: bool) -> Self {
        Self {
            weekends_off,
            holidays: HashSet::new(),
        }
    }

    #[must_use]
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }
}

impl WorkingCalendar for HolidayCalendar {
    fn is_holiday(&self, date: NaiveDateTime) -> bool {
        let day = date.date();
        (self.weekends_off && is_weekend(day)) || self.holidays.contains(&day)
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Unit used to step over holidays: hours for sub-day modes, days otherwise.
#[must_use]
pub fn working_step(view_mode: ViewMode) -> ViewMode {
    match view_mode {
        ViewMode::Hour | ViewMode::QuarterDay | ViewMode::HalfDay => ViewMode::Hour,
        ViewMode::Day | ViewMode::Week | ViewMode::Month | ViewMode::Year => ViewMode::Day,
    }
}

fn scan_working_date<C: WorkingCalendar + ?Sized>(
    calendar: &C,
    date: NaiveDateTime,
    view_mode: ViewMode,
    direction: i64,
) -> NaiveDateTime {
    let step = working_step(view_mode);
    let mut current = step.start_of_unit(date);
    for _ in 0..MAX_CALENDAR_SCAN_STEPS {
        current = step.add_units(current, direction);
        if !calendar.is_holiday(current) {
            return current;
        }
    }
    warn!(
        date = %date,
        direction,
        "no working date found within scan limit; keeping the original date"
    );
    date
}

/// Whole working units in `[start, end)`: units `t` with `t + step <= end`
/// that are not holidays.
#[must_use]
pub fn count_working_units<C: WorkingCalendar + ?Sized>(
    calendar: &C,
    start: NaiveDateTime,
    end: NaiveDateTime,
    view_mode: ViewMode,
) -> i64 {
    let step = working_step(view_mode);
    let mut count = 0;
    let mut cursor = start;
    loop {
        let next = step.add_units(cursor, 1);
        if next > end {
            break;
        }
        if !calendar.is_holiday(cursor) {
            count += 1;
        }
        cursor = next;
    }
    count
}

/// Moves task boundaries off holidays.
///
/// A move keeps the original number of working units: holidays inside the
/// original span are counted, then the new end is found by stepping one
/// working unit at a time from the corrected start.
#[must_use]
pub fn adjust_to_working_dates<C: WorkingCalendar + ?Sized>(
    action: BarMoveAction,
    changed_task: &Task,
    original_task: &Task,
    calendar: &C,
    view_mode: ViewMode,
) -> Task {
    let mut adjusted = changed_task.clone();

    if changed_task.kind == TaskKind::Milestone {
        if calendar.is_holiday(changed_task.start) {
            let next = calendar.next_working_date(changed_task.start, view_mode);
            adjusted.start = next;
            adjusted.end = next;
        }
        return adjusted;
    }

    match action {
        BarMoveAction::Progress => {}
        BarMoveAction::End => {
            if calendar.is_holiday(changed_task.end) {
                adjusted.end =
                    view_mode.round_end_up(calendar.next_working_date(changed_task.end, view_mode));
            }
        }
        BarMoveAction::Start => {
            if calendar.is_holiday(changed_task.start) {
                adjusted.start = view_mode
                    .round_start_down(calendar.previous_working_date(changed_task.start, view_mode));
            }
        }
        BarMoveAction::Move => {
            let (start, end) = shift_preserving_working_units(
                calendar,
                changed_task.start,
                original_task.start,
                original_task.end,
                view_mode,
            );
            adjusted.start = start;
            adjusted.end = end;
        }
    }
    adjusted
}

fn shift_preserving_working_units<C: WorkingCalendar + ?Sized>(
    calendar: &C,
    proposed_start: NaiveDateTime,
    original_start: NaiveDateTime,
    original_end: NaiveDateTime,
    view_mode: ViewMode,
) -> (NaiveDateTime, NaiveDateTime) {
    let step = working_step(view_mode);
    let span_ms = millis_between(original_start, original_end).max(0);
    let whole_units = step.diff_units(original_end, original_start).max(0);
    let remainder_ms = span_ms - millis_between(original_start, step.add_units(original_start, whole_units));
    let required = count_working_units(calendar, original_start, original_end, view_mode);

    let start = if calendar.is_holiday(proposed_start) {
        calendar.next_working_date(proposed_start, view_mode)
    } else {
        proposed_start
    };

    let mut cursor = start;
    let mut remaining = required;
    let mut steps = 0usize;
    while remaining > 0 {
        if steps >= MAX_CALENDAR_SCAN_STEPS {
            warn!(
                start = %start,
                remaining,
                "working-unit walk hit the scan limit; end left short"
            );
            break;
        }
        if !calendar.is_holiday(cursor) {
            remaining -= 1;
        }
        cursor = step.add_units(cursor, 1);
        steps += 1;
    }

    (start, add_millis(cursor, remainder_ms.max(0)))
}

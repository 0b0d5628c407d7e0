use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use gantt_rs::GanttError;
use gantt_rs::core::time_grid::{compute_range_at, seed_dates_between};
use gantt_rs::core::{
    Task, TaskKind, TaskOrEmpty, TimeGrid, ViewMode, calendar_header, seed_dates,
    week_number_iso8601,
};
use proptest::prelude::*;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .expect("valid datetime")
}

fn task(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> TaskOrEmpty {
    Task::new(id, TaskKind::Task, start, end).into()
}

#[test]
fn day_ticks_between_two_dates_are_inclusive() {
    let dates = seed_dates_between(dt(2020, 6, 28, 0), dt(2020, 7, 2, 0), ViewMode::Day);
    assert_eq!(
        dates,
        vec![
            dt(2020, 6, 28, 0),
            dt(2020, 6, 29, 0),
            dt(2020, 6, 30, 0),
            dt(2020, 7, 1, 0),
            dt(2020, 7, 2, 0),
        ]
    );
}

#[test]
fn week_ticks_keep_the_start_weekday() {
    let dates = seed_dates_between(dt(2020, 6, 28, 0), dt(2020, 7, 19, 0), ViewMode::Week);
    assert_eq!(
        dates,
        vec![
            dt(2020, 6, 28, 0),
            dt(2020, 7, 5, 0),
            dt(2020, 7, 12, 0),
            dt(2020, 7, 19, 0),
        ]
    );
}

#[test]
fn seed_dates_yields_unit_count_plus_one_ticks() {
    let dates = seed_dates(dt(2020, 1, 31, 0), 3, ViewMode::Month);
    assert_eq!(dates.len(), 4);
    assert_eq!(dates[1], dt(2020, 2, 29, 0));
    assert!(seed_dates(dt(2020, 1, 1, 0), -5, ViewMode::Day).len() == 1);
}

#[test]
fn day_range_backdates_one_unit_and_pads_nineteen_days() {
    let tasks = vec![
        task("a", dt(2020, 7, 1, 10), dt(2020, 7, 2, 0)),
        task("b", dt(2020, 7, 2, 0), dt(2020, 7, 3, 15)),
    ];
    let (start, units) = compute_range_at(&tasks, ViewMode::Day, 1, dt(1999, 1, 1, 0));
    assert_eq!(start, dt(2020, 6, 30, 0));
    assert_eq!(units, 22);
}

#[test]
fn hour_range_pads_one_trailing_day() {
    let tasks = vec![task("a", dt(2020, 7, 1, 10), dt(2020, 7, 3, 4))];
    let (start, units) = compute_range_at(&tasks, ViewMode::Hour, 1, dt(1999, 1, 1, 0));
    assert_eq!(start, dt(2020, 7, 1, 9));
    assert_eq!(units, 63);
}

#[test]
fn year_range_aligns_to_year_boundaries() {
    let tasks = vec![task("a", dt(2020, 7, 1, 0), dt(2021, 2, 1, 0))];
    let (start, units) = compute_range_at(&tasks, ViewMode::Year, 1, dt(1999, 1, 1, 0));
    assert_eq!(start, dt(2019, 1, 1, 0));
    assert_eq!(units, 3);
}

#[test]
fn empty_rows_only_fall_back_to_now() {
    let tasks = vec![TaskOrEmpty::Empty(gantt_rs::core::EmptyTask::new("placeholder"))];
    let now = dt(2024, 3, 5, 14);
    assert_eq!(compute_range_at(&tasks, ViewMode::Day, 1, now), (now, 2));
    assert_eq!(compute_range_at(&[], ViewMode::Month, 3, now), (now, 2));
}

#[test]
fn grid_content_width_is_one_column_per_tick() {
    let grid = TimeGrid::new(dt(2020, 6, 30, 0), 22, ViewMode::Day);
    assert_eq!(grid.dates().len(), 23);
    assert_eq!(grid.end(), dt(2020, 7, 22, 0));
    assert_eq!(grid.content_width(60.0), 1380.0);
}

#[test]
fn iso_week_numbers_are_two_digits() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
    assert_eq!(week_number_iso8601(date(2021, 1, 4)), "01");
    assert_eq!(week_number_iso8601(date(2021, 1, 1)), "53");
    assert_eq!(week_number_iso8601(date(2020, 7, 20)), "30");
}

#[test]
fn view_mode_parses_loose_spellings() {
    assert_eq!(ViewMode::from_str("Quarter Day").ok(), Some(ViewMode::QuarterDay));
    assert_eq!(ViewMode::from_str("half_day").ok(), Some(ViewMode::HalfDay));
    assert_eq!(ViewMode::from_str("WEEK").ok(), Some(ViewMode::Week));

    let err = ViewMode::from_str("Fortnight").expect_err("unknown mode");
    assert!(matches!(err, GanttError::UnknownViewMode(ref raw) if raw == "Fortnight"));
}

#[test]
fn day_rounding_switches_at_noon() {
    let before_noon = NaiveDate::from_ymd_opt(2020, 7, 1)
        .and_then(|day| day.and_hms_opt(11, 59, 0))
        .expect("valid datetime");
    assert_eq!(ViewMode::Day.round_to_nearest_unit(before_noon), dt(2020, 7, 1, 0));
    assert_eq!(
        ViewMode::Day.round_to_nearest_unit(dt(2020, 7, 1, 12)),
        dt(2020, 7, 2, 0)
    );
    assert_eq!(ViewMode::Day.round_start_down(dt(2020, 7, 1, 23)), dt(2020, 7, 1, 0));
    assert_eq!(ViewMode::Day.round_end_up(dt(2020, 7, 1, 1)), dt(2020, 7, 2, 0));
    assert_eq!(ViewMode::Day.round_end_up(dt(2020, 7, 1, 0)), dt(2020, 7, 1, 0));
}

#[test]
fn header_groups_ticks_under_shared_top_labels() {
    let grid = TimeGrid::new(dt(2020, 7, 30, 0), 3, ViewMode::Day);
    let header = calendar_header(&grid);
    assert_eq!(header.bottom.len(), 4);
    assert_eq!(header.top.len(), 2);
    assert_eq!(header.top[0].text, "July 2020");
    assert_eq!(header.top[0].span, 2);
    assert_eq!(header.top[1].first_column, 2);
}

proptest! {
    #[test]
    fn every_tick_sits_at_its_own_unit_index(
        mode_index in 0usize..7,
        day_offset in 0i64..3_000,
        hour in 0u32..24,
        count in 0i64..40
    ) {
        let mode = ViewMode::ALL[mode_index];
        let raw = dt(2015, 1, 1, hour) + chrono::Duration::days(day_offset);
        let start = mode.start_of_unit(raw);
        let dates = seed_dates(start, count, mode);

        prop_assert_eq!(dates.len() as i64, count + 1);
        for (index, date) in dates.iter().enumerate() {
            prop_assert_eq!(mode.containing_unit_index(*date, start), index as i64);
            prop_assert_eq!(mode.start_of_unit(*date), *date);
        }
    }
}

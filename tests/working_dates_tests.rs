use chrono::{Duration, NaiveDate, NaiveDateTime};
use gantt_rs::core::{
    BarMoveAction, HolidayCalendar, Task, TaskKind, ViewMode, WeekendCalendar, WorkingCalendar,
    adjust_to_working_dates, count_working_units,
};
use proptest::prelude::*;

fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, 0, 0))
        .expect("valid datetime")
}

fn bar(start: NaiveDateTime, end: NaiveDateTime) -> Task {
    Task::new("t", TaskKind::Task, start, end)
}

#[test]
fn weekend_calendar_skips_to_monday_and_back_to_friday() {
    // 2020-07-04 is a Saturday.
    let calendar = WeekendCalendar;
    assert!(calendar.is_holiday(dt(2020, 7, 4, 9)));
    assert!(!calendar.is_holiday(dt(2020, 7, 3, 9)));
    assert_eq!(
        calendar.next_working_date(dt(2020, 7, 4, 9), ViewMode::Day),
        dt(2020, 7, 6, 0)
    );
    assert_eq!(
        calendar.previous_working_date(dt(2020, 7, 5, 9), ViewMode::Day),
        dt(2020, 7, 3, 0)
    );
    assert_eq!(
        calendar.next_working_date(dt(2020, 7, 5, 22), ViewMode::Hour),
        dt(2020, 7, 6, 0)
    );
}

#[test]
fn closures_and_explicit_holidays_act_as_calendars() {
    let national_day = NaiveDate::from_ymd_opt(2020, 7, 14).expect("valid date");
    let closure = move |date: NaiveDateTime| date.date() == national_day;
    assert!(closure.is_holiday(dt(2020, 7, 14, 8)));
    assert_eq!(
        closure.next_working_date(dt(2020, 7, 13, 8), ViewMode::Day),
        dt(2020, 7, 15, 0)
    );

    let calendar = HolidayCalendar::new(true).with_holiday(national_day);
    assert!(calendar.is_holiday(dt(2020, 7, 14, 0)));
    assert!(calendar.is_holiday(dt(2020, 7, 12, 0)));
    assert!(!HolidayCalendar::new(false).is_holiday(dt(2020, 7, 12, 0)));
}

#[test]
fn working_units_ignore_holidays_and_partial_units() {
    let units = count_working_units(
        &WeekendCalendar,
        dt(2020, 7, 1, 0),
        dt(2020, 7, 8, 12),
        ViewMode::Day,
    );
    // Wed, Thu, Fri, Mon, Tue.
    assert_eq!(units, 5);
}

#[test]
fn milestone_on_a_holiday_moves_forward() {
    let milestone = Task::milestone("m", dt(2020, 7, 4, 0));
    let adjusted = adjust_to_working_dates(
        BarMoveAction::Move,
        &milestone,
        &milestone,
        &WeekendCalendar,
        ViewMode::Day,
    );
    assert_eq!(adjusted.start, dt(2020, 7, 6, 0));
    assert_eq!(adjusted.end, adjusted.start);
}

#[test]
fn resized_edges_leave_holidays() {
    let original = bar(dt(2020, 7, 1, 0), dt(2020, 7, 3, 0));

    let end_on_sunday = bar(original.start, dt(2020, 7, 5, 12));
    let adjusted = adjust_to_working_dates(
        BarMoveAction::End,
        &end_on_sunday,
        &original,
        &WeekendCalendar,
        ViewMode::Day,
    );
    assert_eq!(adjusted.end, dt(2020, 7, 6, 0));
    assert_eq!(adjusted.start, original.start);

    let start_on_saturday = bar(dt(2020, 7, 4, 10), dt(2020, 7, 9, 0));
    let adjusted = adjust_to_working_dates(
        BarMoveAction::Start,
        &start_on_saturday,
        &original,
        &WeekendCalendar,
        ViewMode::Day,
    );
    assert_eq!(adjusted.start, dt(2020, 7, 3, 0));
    assert_eq!(adjusted.end, dt(2020, 7, 9, 0));
}

#[test]
fn move_over_a_weekend_keeps_the_working_length() {
    // Wed..Fri is two working days; dropped onto Saturday it becomes Mon..Wed.
    let original = bar(dt(2020, 7, 1, 0), dt(2020, 7, 3, 0));
    let moved = bar(dt(2020, 7, 4, 0), dt(2020, 7, 6, 0));
    let adjusted = adjust_to_working_dates(
        BarMoveAction::Move,
        &moved,
        &original,
        &WeekendCalendar,
        ViewMode::Day,
    );
    assert_eq!(adjusted.start, dt(2020, 7, 6, 0));
    assert_eq!(adjusted.end, dt(2020, 7, 8, 0));
}

#[test]
fn progress_changes_are_left_alone() {
    let original = bar(dt(2020, 7, 4, 0), dt(2020, 7, 5, 0));
    let adjusted = adjust_to_working_dates(
        BarMoveAction::Progress,
        &original.clone().with_progress(40),
        &original,
        &WeekendCalendar,
        ViewMode::Day,
    );
    assert_eq!(adjusted.start, original.start);
    assert_eq!(adjusted.progress, 40);
}

proptest! {
    #[test]
    fn move_preserves_working_unit_count(
        original_offset in 0i64..30,
        length in 1i64..20,
        extra_hours in 0i64..24,
        target_offset in 0i64..60
    ) {
        let base = dt(2020, 7, 6, 0);
        let start = base + Duration::days(original_offset);
        let end = start + Duration::days(length) + Duration::hours(extra_hours);
        let original = bar(start, end);
        let proposed_start = base + Duration::days(target_offset);
        let moved = bar(proposed_start, proposed_start + (end - start));

        let adjusted = adjust_to_working_dates(
            BarMoveAction::Move,
            &moved,
            &original,
            &WeekendCalendar,
            ViewMode::Day,
        );

        prop_assert!(!WeekendCalendar.is_holiday(adjusted.start));
        prop_assert!(adjusted.end >= adjusted.start);
        prop_assert_eq!(
            count_working_units(&WeekendCalendar, adjusted.start, adjusted.end, ViewMode::Day),
            count_working_units(&WeekendCalendar, original.start, original.end, ViewMode::Day)
        );
    }
}

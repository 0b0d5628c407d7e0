use chrono::{Duration, NaiveDateTime};

/// Milliseconds between two instants (`to - from`).
#[must_use]
pub fn millis_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_milliseconds()
}

/// Shifts an instant by a signed millisecond delta.
#[must_use]
pub fn add_millis(date: NaiveDateTime, delta_ms: i64) -> NaiveDateTime {
    date + Duration::milliseconds(delta_ms)
}

/// Shifts an instant by a fractional millisecond delta, rounded to the
/// nearest whole millisecond.
#[must_use]
pub fn add_millis_f64(date: NaiveDateTime, delta_ms: f64) -> NaiveDateTime {
    add_millis(date, delta_ms.round() as i64)
}

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::GanttError;

/// Timeline zoom granularity.
///
/// `QuarterDay` and `HalfDay` are fixed 6h/12h steps anchored at midnight,
/// not calendar quarters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    Hour,
    QuarterDay,
    HalfDay,
    Day,
    Week,
    Month,
    Year,
}

impl ViewMode {
    pub const ALL: [ViewMode; 7] = [
        ViewMode::Hour,
        ViewMode::QuarterDay,
        ViewMode::HalfDay,
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Year,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ViewMode::Hour => "Hour",
            ViewMode::QuarterDay => "Quarter Day",
            ViewMode::HalfDay => "Half Day",
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Year => "Year",
        }
    }

    /// Fixed length of one unit for the hour-based modes.
    const fn fixed_hours(self) -> Option<i64> {
        match self {
            ViewMode::Hour => Some(1),
            ViewMode::QuarterDay => Some(6),
            ViewMode::HalfDay => Some(12),
            ViewMode::Day => Some(24),
            ViewMode::Week => Some(24 * 7),
            ViewMode::Month | ViewMode::Year => None,
        }
    }

    /// Adds `count` units (negative values subtract). Saturates at the
    /// representable chrono range.
    #[must_use]
    pub fn add_units(self, date: NaiveDateTime, count: i64) -> NaiveDateTime {
        match self {
            ViewMode::Month => add_months(date, count),
            ViewMode::Year => add_months(date, count.saturating_mul(12)),
            fixed => {
                let hours = fixed.fixed_hours().unwrap_or(1).saturating_mul(count);
                let fallback = if count < 0 { Duration::MIN } else { Duration::MAX };
                shift(date, Duration::try_hours(hours).unwrap_or(fallback))
            }
        }
    }

    #[must_use]
    pub fn sub_units(self, date: NaiveDateTime, count: i64) -> NaiveDateTime {
        self.add_units(date, count.saturating_neg())
    }

    /// Number of whole units from `earlier` to `later`, truncated toward zero.
    #[must_use]
    pub fn diff_units(self, later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
        match self {
            ViewMode::Month => diff_months(later, earlier),
            ViewMode::Year => diff_months(later, earlier) / 12,
            ViewMode::Day => (later - earlier).num_days(),
            ViewMode::Week => (later - earlier).num_weeks(),
            fixed => (later - earlier).num_hours() / fixed.fixed_hours().unwrap_or(1),
        }
    }

    /// Index of the unit that contains `date`, counted from `origin`.
    ///
    /// Unlike [`ViewMode::diff_units`] this floors for dates before `origin`,
    /// so `add_units(origin, index) <= date < add_units(origin, index + 1)`.
    #[must_use]
    pub fn containing_unit_index(self, date: NaiveDateTime, origin: NaiveDateTime) -> i64 {
        let mut index = self.diff_units(date, origin);
        while self.add_units(origin, index) > date {
            index -= 1;
        }
        while self.add_units(origin, index + 1) <= date {
            index += 1;
        }
        index
    }

    #[must_use]
    pub fn start_of_unit(self, date: NaiveDateTime) -> NaiveDateTime {
        let day = date.date();
        match self {
            ViewMode::Hour => at(day, date.hour()),
            ViewMode::QuarterDay => at(day, date.hour() - date.hour() % 6),
            ViewMode::HalfDay => at(day, date.hour() - date.hour() % 12),
            ViewMode::Day => at(day, 0),
            ViewMode::Week => {
                let offset = i64::from(day.weekday().num_days_from_monday());
                at(day - Duration::days(offset), 0)
            }
            ViewMode::Month => at(day.with_day(1).unwrap_or(day), 0),
            ViewMode::Year => at(
                NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day),
                0,
            ),
        }
    }

    /// Last representable millisecond of the unit containing `date`.
    #[must_use]
    pub fn end_of_unit(self, date: NaiveDateTime) -> NaiveDateTime {
        let next = self.add_units(self.start_of_unit(date), 1);
        shift(next, Duration::milliseconds(-1))
    }

    /// Snaps to whichever unit boundary is closer; the midpoint rounds up.
    #[must_use]
    pub fn round_to_nearest_unit(self, date: NaiveDateTime) -> NaiveDateTime {
        let start = self.start_of_unit(date);
        if start == date {
            return date;
        }
        let next = self.add_units(start, 1);
        if date - start < next - date {
            start
        } else {
            next
        }
    }

    #[must_use]
    pub fn round_start_down(self, date: NaiveDateTime) -> NaiveDateTime {
        self.start_of_unit(date)
    }

    #[must_use]
    pub fn round_end_up(self, date: NaiveDateTime) -> NaiveDateTime {
        let start = self.start_of_unit(date);
        if start == date {
            date
        } else {
            self.add_units(start, 1)
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = GanttError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "hour" => Ok(ViewMode::Hour),
            "quarterday" => Ok(ViewMode::QuarterDay),
            "halfday" => Ok(ViewMode::HalfDay),
            "day" => Ok(ViewMode::Day),
            "week" => Ok(ViewMode::Week),
            "month" => Ok(ViewMode::Month),
            "year" => Ok(ViewMode::Year),
            _ => Err(GanttError::UnknownViewMode(value.to_owned())),
        }
    }
}

/// Two-digit ISO-8601 week number of `date`.
#[must_use]
pub fn week_number_iso8601(date: NaiveDate) -> String {
    format!("{:02}", date.iso_week().week())
}

fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN))
}

fn shift(date: NaiveDateTime, delta: Duration) -> NaiveDateTime {
    date.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

fn add_months(date: NaiveDateTime, count: i64) -> NaiveDateTime {
    let magnitude = u32::try_from(count.unsigned_abs()).unwrap_or(u32::MAX);
    let shifted = if count >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    };
    shifted.unwrap_or(if count < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

fn diff_months(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month0())
        - i64::from(earlier.month0());
    if later >= earlier {
        if add_months(earlier, months) > later {
            months -= 1;
        }
    } else if add_months(earlier, months) < later {
        months += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|day| day.and_hms_opt(h, 0, 0))
            .expect("valid datetime")
    }

    #[test]
    fn diff_months_respects_day_of_month() {
        assert_eq!(diff_months(dt(2020, 3, 14, 0), dt(2020, 1, 15, 0)), 1);
        assert_eq!(diff_months(dt(2020, 3, 15, 0), dt(2020, 1, 15, 0)), 2);
        assert_eq!(diff_months(dt(2020, 1, 15, 0), dt(2020, 3, 14, 0)), -1);
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(dt(2020, 1, 31, 0), 1), dt(2020, 2, 29, 0));
        assert_eq!(add_months(dt(2020, 3, 31, 0), -1), dt(2020, 2, 29, 0));
    }

    #[test]
    fn huge_negative_hour_shift_saturates_backwards() {
        let date = dt(2020, 7, 1, 0);
        assert_eq!(
            ViewMode::Hour.add_units(date, i64::MIN / 2),
            NaiveDateTime::MIN
        );
        assert_eq!(ViewMode::Day.sub_units(date, i64::MAX), NaiveDateTime::MIN);
        assert_eq!(ViewMode::Day.add_units(date, i64::MAX), NaiveDateTime::MAX);
    }
}

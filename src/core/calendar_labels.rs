use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::view_mode::week_number_iso8601;
use crate::core::{TimeGrid, ViewMode};

/// One header cell spanning `span` grid columns from `first_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderLabel {
    pub text: String,
    pub first_column: usize,
    pub span: usize,
}

impl HeaderLabel {
    /// Pixel range `(left, right)` of the cell; RTL mirrors around the
    /// content width.
    #[must_use]
    pub fn x_range(&self, column_width: f64, content_width: f64, rtl: bool) -> (f64, f64) {
        let left = self.first_column as f64 * column_width;
        let right = (self.first_column + self.span) as f64 * column_width;
        if rtl {
            (content_width - right, content_width - left)
        } else {
            (left, right)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHeader {
    /// Grouped labels, one per run of equal text.
    pub top: Vec<HeaderLabel>,
    /// One label per grid tick.
    pub bottom: Vec<HeaderLabel>,
}

#[must_use]
pub fn bottom_label(view_mode: ViewMode, date: NaiveDateTime) -> String {
    match view_mode {
        ViewMode::Year => date.year().to_string(),
        ViewMode::Month => date.format("%B").to_string(),
        ViewMode::Week => format!("W{}", week_number_iso8601(date.date())),
        ViewMode::Day => date.format("%a, %-d").to_string(),
        ViewMode::QuarterDay | ViewMode::HalfDay => date.format("%H:%M").to_string(),
        ViewMode::Hour => date.format("%H").to_string(),
    }
}

#[must_use]
pub fn top_label(view_mode: ViewMode, date: NaiveDateTime) -> String {
    match view_mode {
        ViewMode::Year | ViewMode::Month => date.year().to_string(),
        ViewMode::Week | ViewMode::Day => date.format("%B %Y").to_string(),
        ViewMode::QuarterDay | ViewMode::HalfDay | ViewMode::Hour => {
            date.format("%a, %-d %B").to_string()
        }
    }
}

#[must_use]
pub fn calendar_header(grid: &TimeGrid) -> CalendarHeader {
    let view_mode = grid.view_mode();
    let mut header = CalendarHeader::default();

    for (column, date) in grid.dates().iter().enumerate() {
        header.bottom.push(HeaderLabel {
            text: bottom_label(view_mode, *date),
            first_column: column,
            span: 1,
        });

        let text = top_label(view_mode, *date);
        match header.top.last_mut() {
            Some(last) if last.text == text => last.span += 1,
            _ => header.top.push(HeaderLabel {
                text,
                first_column: column,
                span: 1,
            }),
        }
    }
    header
}

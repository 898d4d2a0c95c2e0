//! Reporting-month boundary computation
//!
//! Reports always cover the previous calendar month. Bounds are
//! rendered in the index's timestamp wire format (`YYYYMMDDHHMMSS`),
//! with the end bound exclusive.

use chrono::{Datelike, Local, NaiveDate};

/// `[start, end)` bounds of the calendar month before `today`.
///
/// Both bounds point at midnight on the first of a month, so the end
/// bound is the first instant outside the reporting window.
pub fn previous_month_bounds(today: NaiveDate) -> (String, String) {
    let (prev_year, prev_month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };

    let start = format!("{:04}{:02}01000000", prev_year, prev_month);
    let end = format!("{:04}{:02}01000000", today.year(), today.month());
    (start, end)
}

/// Bounds of the month before the current local date.
pub fn current_previous_month_bounds() -> (String, String) {
    previous_month_bounds(Local::now().date_naive())
}

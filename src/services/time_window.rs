//! Time-of-day and day-of-week bucketing
//!
//! Pure functions over a naive wall-clock timestamp. No timezone
//! conversion happens anywhere in the pipeline: the printed values of
//! the record's timestamp string are used as-is.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use std::ops::Range;

use crate::models::TimeBucket;

/// Weekday business-hours window, hours [start, end).
///
/// 07:00 is the first business minute; 20:00 is already non-business.
pub const BUSINESS_HOURS: Range<u32> = 7..20;

pub fn is_weekend(ts: &NaiveDateTime) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_business_hours(ts: &NaiveDateTime) -> bool {
    BUSINESS_HOURS.contains(&ts.hour())
}

/// Assign a timestamp to its time bucket.
///
/// Weekend takes precedence over the hour rule: a Saturday record is
/// Weekend no matter the hour.
pub fn classify(ts: &NaiveDateTime) -> TimeBucket {
    if is_weekend(ts) {
        TimeBucket::Weekend
    } else if is_business_hours(ts) {
        TimeBucket::Business
    } else {
        TimeBucket::NonBusiness
    }
}

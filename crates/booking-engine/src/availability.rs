//! Open windows of a schedule on a given date.
//!
//! An exception for the date fully replaces the weekly template: a closed
//! exception (or an open one with no windows) means no windows at all, an
//! open exception means exactly its own windows. Without an exception the
//! template windows for the weekday apply.

use chrono::{DateTime, Utc};

use crate::schedule::{DailyWindow, Schedule};
use crate::time_window::{
    add_days, minutes_of_day, truncate_to_day, weekday_index, MINUTES_PER_DAY,
};

/// Windows open on `day`'s UTC date, sorted by start.
pub fn resolve_windows(schedule: &Schedule, day: DateTime<Utc>) -> Vec<DailyWindow> {
    let mut windows: Vec<DailyWindow> = match schedule.exception_for(day.date_naive()) {
        Some(exception) if !exception.available => Vec::new(),
        Some(exception) => exception.windows.clone(),
        None => schedule
            .template_windows(weekday_index(day))
            .copied()
            .collect(),
    };
    windows.sort();
    windows
}

/// Whether `[start, end]` lies inside a single open window of `start`'s date.
///
/// A range that spans two windows, or runs past midnight, is not available.
/// An `end` of exactly the next midnight counts as minute 1440 and fits a
/// window closing at `"24:00"`.
pub fn is_within_availability(
    schedule: &Schedule,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    if end <= start {
        return false;
    }

    let day = truncate_to_day(start);
    let end_min = if truncate_to_day(end) == day {
        minutes_of_day(end)
    } else if end == add_days(day, 1) {
        MINUTES_PER_DAY
    } else {
        return false;
    };
    let start_min = minutes_of_day(start);

    resolve_windows(schedule, start)
        .iter()
        .any(|w| w.contains(start_min, end_min))
}

//! Fixed-duration candidate slots inside a schedule's open windows.
//!
//! Candidates step through each window by the offering's duration from the
//! window start. The buffer never widens the stride; it only widens existing
//! appointments when filtering.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::appointment::Appointment;
use crate::availability::resolve_windows;
use crate::conflict::collides_with;
use crate::offering::Offering;
use crate::schedule::Schedule;
use crate::time_window::{add_minutes, at_minute, iterate_days, MINUTES_PER_DAY};

/// A bookable `[start, end)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Free slots for `offering` on `schedule` inside `[from, to_exclusive)`.
///
/// Slots colliding with a blocking appointment in `existing` (widened by the
/// schedule buffer) are dropped. The result is chronological, without
/// duplicates, and depends only on the inputs.
pub fn generate_slots(
    schedule: &Schedule,
    offering: &Offering,
    from: DateTime<Utc>,
    to_exclusive: DateTime<Utc>,
    existing: &[Appointment],
) -> Vec<Slot> {
    let duration = offering.duration_minutes;
    // No window is longer than a day.
    if duration == 0 || duration > MINUTES_PER_DAY {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for day in iterate_days(from, to_exclusive) {
        for window in resolve_windows(schedule, day) {
            let window_end = window.end.minutes();
            let mut start_min = window.start.minutes();

            while start_min + duration <= window_end {
                let start = at_minute(day, start_min);
                let end = add_minutes(start, i64::from(duration));
                start_min += duration;

                if start < from || end > to_exclusive {
                    continue;
                }
                if existing
                    .iter()
                    .any(|a| collides_with(a, start, end, schedule.buffer_minutes))
                {
                    continue;
                }
                slots.push(Slot { start, end });
            }
        }
    }

    slots.sort();
    slots.dedup();
    slots
}

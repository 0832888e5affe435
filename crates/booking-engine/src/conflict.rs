//! Buffered conflict detection between a candidate interval and the
//! appointments already booked on a schedule.

use chrono::{DateTime, Utc};

use crate::appointment::Appointment;
use crate::error::Result;
use crate::ports::{AppointmentRepository, RangeQuery};
use crate::time_window::add_minutes;

/// Strict half-open overlap: touching intervals do not overlap.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// `[start - buffer, end + buffer)`.
pub fn buffered_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    buffer_minutes: u32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let buffer = i64::from(buffer_minutes);
    (add_minutes(start, -buffer), add_minutes(end, buffer))
}

/// Whether `[start, end)` collides with `existing` once `existing` is widened
/// by the buffer. Appointments that no longer block the schedule never collide.
pub fn collides_with(
    existing: &Appointment,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    buffer_minutes: u32,
) -> bool {
    if !existing.status.blocks_schedule() {
        return false;
    }
    let (from, to) = buffered_interval(existing.start, existing.end, buffer_minutes);
    intervals_overlap(start, end, from, to)
}

/// Whether booking `[start, end)` on `schedule_id` would violate the buffer
/// around any blocking appointment.
///
/// The repository is asked for raw overlaps with the candidate widened by the
/// buffer, which is equivalent to widening every stored appointment.
/// `exclude_id` skips one appointment, used when it is about to be replaced.
pub fn has_conflict(
    repo: &dyn AppointmentRepository,
    schedule_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    buffer_minutes: u32,
    exclude_id: Option<&str>,
) -> Result<bool> {
    let (from, to) = buffered_interval(start, end, buffer_minutes);
    let overlapping = repo.find_overlap(&RangeQuery::new(schedule_id, from, to))?;

    Ok(overlapping
        .iter()
        .any(|a| a.status.blocks_schedule() && exclude_id != Some(a.id.as_str())))
}

//! Minute-granular time arithmetic on a single absolute timeline.
//!
//! Every function here works in `chrono::Utc`. A schedule's timezone is
//! display metadata and never enters these calculations: a "day" is a UTC
//! calendar day and "minute of day" counts from UTC midnight.
//!
//! # Functions
//!
//! - [`parse_time_of_day`] — `"HH:MM"` → minutes since midnight
//! - [`minutes_of_day`] — minute offset of an instant inside its day
//! - [`truncate_to_day`], [`add_minutes`], [`add_days`], [`at_minute`]
//! - [`date_key`] — canonical `YYYY-MM-DD` key used to match exceptions
//! - [`iterate_days`] — finite, restartable sequence of day starts

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// Minutes in a day. Also the value of `"24:00"`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ── TimeOfDay ───────────────────────────────────────────────────────────────

/// A wall-clock time inside a day at minute granularity, written `"HH:MM"`.
///
/// Holds `0..=1440`; `1440` (`"24:00"`) is only meaningful as the end of a
/// window that closes at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Build from hours and minutes, rejecting anything past `24:00`.
    pub fn from_hm(hours: u32, minutes: u32) -> Result<Self> {
        match (hours, minutes) {
            (0..=23, 0..=59) | (24, 0) => Ok(TimeOfDay(hours * 60 + minutes)),
            _ => Err(BookingError::InvalidTimeFormat(format!("{hours:02}:{minutes:02}"))),
        }
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_of_day(s).map(TimeOfDay)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = BookingError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse `"HH:MM"` (or `"H:MM"`) into minutes since midnight.
///
/// Hours run `0..=23`, minutes `00..=59`; `"24:00"` is accepted as the end
/// of the day.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTimeFormat`] for anything else, including
/// missing colons, non-digit characters, single-digit minutes and
/// out-of-range components.
///
/// # Examples
///
/// ```
/// use booking_engine::time_window::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("09:30").unwrap(), 570);
/// assert!(parse_time_of_day("9h30").is_err());
/// ```
pub fn parse_time_of_day(s: &str) -> Result<u32> {
    let invalid = || BookingError::InvalidTimeFormat(s.to_string());

    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if h.is_empty() || h.len() > 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
        return Err(invalid());
    }

    let hours: u32 = h.parse().map_err(|_| invalid())?;
    let minutes: u32 = m.parse().map_err(|_| invalid())?;

    TimeOfDay::from_hm(hours, minutes)
        .map(TimeOfDay::minutes)
        .map_err(|_| invalid())
}

// ── Instant arithmetic ──────────────────────────────────────────────────────

/// Minute offset of `instant` within its UTC day (`0..1440`).
pub fn minutes_of_day(instant: DateTime<Utc>) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// Midnight at the start of `instant`'s UTC day.
pub fn truncate_to_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

pub fn add_minutes(instant: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    instant + Duration::minutes(minutes)
}

pub fn add_days(day: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    day + Duration::days(days)
}

/// The instant `minute` minutes after the start of `day`'s UTC day.
pub fn at_minute(day: DateTime<Utc>, minute: u32) -> DateTime<Utc> {
    add_minutes(truncate_to_day(day), i64::from(minute))
}

/// Midnight at the start of a calendar date.
pub fn start_of_date(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Canonical `YYYY-MM-DD` key of `instant`'s UTC day.
pub fn date_key(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

/// Weekday of `instant` with Sunday as `0`, matching schedule templates.
pub fn weekday_index(instant: DateTime<Utc>) -> u8 {
    // num_days_from_sunday is 0..=6
    instant.weekday().num_days_from_sunday() as u8
}

/// Fractional hours from `now` until `target` (negative when `target` is past).
pub fn hours_until(now: DateTime<Utc>, target: DateTime<Utc>) -> f64 {
    (target - now).num_milliseconds() as f64 / 3_600_000.0
}

// ── Day iteration ───────────────────────────────────────────────────────────

/// Iterator over day starts produced by [`iterate_days`].
///
/// Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct DayIter {
    cursor: Option<DateTime<Utc>>,
    last: DateTime<Utc>,
}

/// Day starts from the day containing `from` through the day containing
/// `to_exclusive - 1ms`. Empty when `to_exclusive <= from`.
///
/// # Examples
///
/// ```
/// use booking_engine::time_window::iterate_days;
/// use chrono::{TimeZone, Utc};
///
/// let from = Utc.with_ymd_and_hms(2025, 1, 1, 15, 0, 0).unwrap();
/// let to = Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap();
/// assert_eq!(iterate_days(from, to).count(), 2);
/// ```
pub fn iterate_days(from: DateTime<Utc>, to_exclusive: DateTime<Utc>) -> DayIter {
    let cursor = (to_exclusive > from).then(|| truncate_to_day(from));
    DayIter {
        cursor,
        last: truncate_to_day(to_exclusive - Duration::milliseconds(1)),
    }
}

impl Iterator for DayIter {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.cursor?;
        if day > self.last {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(add_days(day, 1));
        Some(day)
    }
}

impl FusedIterator for DayIter {}

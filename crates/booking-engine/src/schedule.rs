//! A professional's availability: a weekly template plus date exceptions.
//!
//! The template says which windows are open on each weekday. An exception
//! replaces the template for exactly one calendar date; it is never merged
//! with it. Resolution lives in [`crate::availability`].

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::time_window::TimeOfDay;

/// An open `[start, end)` interval inside a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyWindow {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl DailyWindow {
    /// Parse a window from two `"HH:MM"` strings, requiring `start < end`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let window = DailyWindow {
            start: start.parse()?,
            end: end.parse()?,
        };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(BookingError::InvalidSchedule(format!(
                "window {}-{} does not end after it starts",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// Whether the minute range `[start_min, end_min]` fits inside this window.
    pub fn contains(&self, start_min: u32, end_min: u32) -> bool {
        self.start.minutes() <= start_min && end_min <= self.end.minutes()
    }
}

/// Windows open on one weekday. Several entries may share a weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTemplateItem {
    /// 0 = Sunday through 6 = Saturday.
    pub weekday: u8,
    pub windows: Vec<DailyWindow>,
}

/// Override for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleException {
    pub date: NaiveDate,
    pub available: bool,
    #[serde(default)]
    pub windows: Vec<DailyWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub professional_id: String,
    /// IANA name; carried for display, never used in calculations.
    pub timezone: String,
    /// Minimum gap kept before and after every appointment.
    #[serde(default)]
    pub buffer_minutes: u32,
    pub weekly_template: Vec<WeeklyTemplateItem>,
    #[serde(default)]
    pub exceptions: Vec<ScheduleException>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// The exception registered for `date`, if any.
    pub fn exception_for(&self, date: NaiveDate) -> Option<&ScheduleException> {
        self.exceptions.iter().find(|e| e.date == date)
    }

    /// Template windows for `weekday` (0 = Sunday), across every matching entry.
    pub fn template_windows(&self, weekday: u8) -> impl Iterator<Item = &DailyWindow> + '_ {
        self.weekly_template
            .iter()
            .filter(move |item| item.weekday == weekday)
            .flat_map(|item| item.windows.iter())
    }

    /// Check the structural invariants of a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidSchedule`] if a weekday is outside
    /// `0..=6`, a window does not end after it starts, two exceptions share a
    /// date, or the timezone is not a known IANA name.
    pub fn validate(&self) -> Result<()> {
        self.timezone.parse::<Tz>().map_err(|_| {
            BookingError::InvalidSchedule(format!("unknown timezone '{}'", self.timezone))
        })?;

        for item in &self.weekly_template {
            if item.weekday > 6 {
                return Err(BookingError::InvalidSchedule(format!(
                    "weekday {} out of range 0..=6",
                    item.weekday
                )));
            }
            item.windows.iter().try_for_each(DailyWindow::validate)?;
        }

        let mut seen = HashSet::new();
        for exception in &self.exceptions {
            if !seen.insert(exception.date) {
                return Err(BookingError::InvalidSchedule(format!(
                    "more than one exception for {}",
                    exception.date
                )));
            }
            exception.windows.iter().try_for_each(DailyWindow::validate)?;
        }

        Ok(())
    }
}

//! Data-access and infrastructure seams consumed by the use cases.
//!
//! Production adapters and the in-memory doubles in [`crate::memory`]
//! implement the same traits. Every method returns [`Result`] so storage
//! failures propagate to the caller as [`crate::BookingError::Storage`].

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::appointment::Appointment;
use crate::error::Result;
use crate::offering::Offering;
use crate::schedule::Schedule;

/// Appointments on one schedule intersecting `[from, to)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    pub schedule_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl RangeQuery {
    pub fn new(schedule_id: impl Into<String>, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            from,
            to,
        }
    }

    /// Raw half-open intersection with `[start, end)`.
    pub fn intersects(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.to && self.from < end
    }
}

pub trait OfferingRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Offering>>;
}

pub trait ScheduleRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Schedule>>;
}

pub trait AppointmentRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Appointment>>;

    /// Appointments of `query.schedule_id` whose raw `[start, end)` intersects
    /// `[query.from, query.to)`, in any status. No buffer is applied here.
    fn find_overlap(&self, query: &RangeQuery) -> Result<Vec<Appointment>>;

    /// Same selection as [`find_overlap`](Self::find_overlap), ordered by start.
    fn list_by_schedule_and_range(&self, query: &RangeQuery) -> Result<Vec<Appointment>>;

    fn create(&self, appointment: &Appointment) -> Result<()>;

    /// Upsert by id.
    fn save(&self, appointment: &Appointment) -> Result<()>;

    fn update(&self, appointment: &Appointment) -> Result<()> {
        self.save(appointment)
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator: Send + Sync {
    /// A string never returned before by this generator.
    fn next_id(&self) -> String;
}

/// Reads the OS clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

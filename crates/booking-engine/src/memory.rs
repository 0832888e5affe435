//! In-memory implementations of the ports, for tests and embedding.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::appointment::Appointment;
use crate::error::{BookingError, Result};
use crate::offering::Offering;
use crate::ports::{
    AppointmentRepository, Clock, IdGenerator, OfferingRepository, RangeQuery, ScheduleRepository,
};
use crate::schedule::Schedule;

// ── Repositories ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InMemoryOfferingRepository {
    rows: RwLock<Vec<Offering>>,
}

impl InMemoryOfferingRepository {
    pub fn new(rows: Vec<Offering>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Insert or replace by id.
    pub fn insert(&self, offering: Offering) {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|o| o.id == offering.id) {
            Some(row) => *row = offering,
            None => rows.push(offering),
        }
    }
}

impl OfferingRepository for InMemoryOfferingRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Offering>> {
        Ok(self.rows.read().iter().find(|o| o.id == id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryScheduleRepository {
    rows: RwLock<Vec<Schedule>>,
}

impl InMemoryScheduleRepository {
    pub fn new(rows: Vec<Schedule>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Insert or replace by id.
    pub fn insert(&self, schedule: Schedule) {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|s| s.id == schedule.id) {
            Some(row) => *row = schedule,
            None => rows.push(schedule),
        }
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Schedule>> {
        Ok(self.rows.read().iter().find(|s| s.id == id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    rows: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(rows: Vec<Appointment>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Snapshot of every stored appointment in insertion order.
    pub fn all(&self) -> Vec<Appointment> {
        self.rows.read().clone()
    }

    fn matching(&self, query: &RangeQuery) -> Vec<Appointment> {
        self.rows
            .read()
            .iter()
            .filter(|a| a.schedule_id == query.schedule_id && query.intersects(a.start, a.end))
            .cloned()
            .collect()
    }
}

impl AppointmentRepository for InMemoryAppointmentRepository {
    fn find_by_id(&self, id: &str) -> Result<Option<Appointment>> {
        Ok(self.rows.read().iter().find(|a| a.id == id).cloned())
    }

    fn find_overlap(&self, query: &RangeQuery) -> Result<Vec<Appointment>> {
        Ok(self.matching(query))
    }

    fn list_by_schedule_and_range(&self, query: &RangeQuery) -> Result<Vec<Appointment>> {
        let mut rows = self.matching(query);
        rows.sort_by_key(|a| a.start);
        Ok(rows)
    }

    fn create(&self, appointment: &Appointment) -> Result<()> {
        let mut rows = self.rows.write();
        if rows.iter().any(|a| a.id == appointment.id) {
            return Err(BookingError::Storage(format!(
                "duplicate appointment id {}",
                appointment.id
            )));
        }
        rows.push(appointment.clone());
        Ok(())
    }

    fn save(&self, appointment: &Appointment) -> Result<()> {
        let mut rows = self.rows.write();
        match rows.iter_mut().find(|a| a.id == appointment.id) {
            Some(row) => *row = appointment.clone(),
            None => rows.push(appointment.clone()),
        }
        Ok(())
    }
}

// ── Clock and ids ───────────────────────────────────────────────────────────

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.write() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}

/// Ids of the form `{prefix}-{n}` counting up from 1.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}

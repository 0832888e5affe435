//! Shared fixtures for the use-case tests.

#![allow(dead_code)]

use booking_engine::memory::{
    FixedClock, InMemoryAppointmentRepository, InMemoryOfferingRepository,
    InMemoryScheduleRepository, SequentialIds,
};
use booking_engine::time_window::weekday_index;
use booking_engine::{
    Appointment, AppointmentRepository, AppointmentStatus, CancellationPolicy, DailyWindow, Deps,
    Offering, OfferingStatus, Schedule, ScheduleException, WeeklyTemplateItem,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

pub fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, mo, d).unwrap()
}

pub fn window(start: &str, end: &str) -> DailyWindow {
    DailyWindow::parse(start, end).unwrap()
}

pub fn offering(id: &str, duration_minutes: u32) -> Offering {
    let created = utc(2024, 12, 1, 0, 0);
    Offering {
        id: id.into(),
        name: format!("Consultation {duration_minutes}m"),
        duration_minutes,
        price: Some(50.0),
        status: OfferingStatus::Active,
        created_at: created,
        updated_at: created,
    }
}

/// Schedule `sch-1` for `pro-1` with the given windows on `day`'s weekday.
pub fn schedule_for(
    day: DateTime<Utc>,
    windows: Vec<DailyWindow>,
    buffer_minutes: u32,
) -> Schedule {
    let created = utc(2024, 12, 1, 0, 0);
    Schedule {
        id: "sch-1".into(),
        professional_id: "pro-1".into(),
        timezone: "America/Argentina/Buenos_Aires".into(),
        buffer_minutes,
        weekly_template: vec![WeeklyTemplateItem {
            weekday: weekday_index(day),
            windows,
        }],
        exceptions: vec![],
        created_at: created,
        updated_at: created,
    }
}

/// Open 00:00-23:59 on `day`'s weekday.
pub fn full_day_schedule_for(day: DateTime<Utc>, buffer_minutes: u32) -> Schedule {
    schedule_for(day, vec![window("00:00", "23:59")], buffer_minutes)
}

pub fn closed_on(mut schedule: Schedule, day: NaiveDate) -> Schedule {
    schedule.exceptions.push(ScheduleException {
        date: day,
        available: false,
        windows: vec![],
    });
    schedule
}

pub fn appointment(
    id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    status: AppointmentStatus,
) -> Appointment {
    let created = utc(2024, 12, 31, 9, 0);
    Appointment {
        id: id.into(),
        schedule_id: "sch-1".into(),
        offering_id: "off-30".into(),
        professional_id: "pro-1".into(),
        customer_id: "cus-1".into(),
        start,
        end,
        status,
        notes: None,
        audit: vec![],
        created_at: created,
        updated_at: created,
    }
}

/// In-memory ports wired together, with a 24 hour cancellation window.
pub struct Fixture {
    pub offerings: InMemoryOfferingRepository,
    pub schedules: InMemoryScheduleRepository,
    pub appointments: InMemoryAppointmentRepository,
    pub clock: FixedClock,
    pub ids: SequentialIds,
    pub policy: CancellationPolicy,
}

impl Fixture {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            offerings: InMemoryOfferingRepository::default(),
            schedules: InMemoryScheduleRepository::default(),
            appointments: InMemoryAppointmentRepository::new(),
            clock: FixedClock::new(now),
            ids: SequentialIds::new("appt-new"),
            policy: CancellationPolicy::new(24),
        }
    }

    pub fn with_offering(self, offering: Offering) -> Self {
        self.offerings.insert(offering);
        self
    }

    pub fn with_schedule(self, schedule: Schedule) -> Self {
        self.schedules.insert(schedule);
        self
    }

    pub fn with_appointment(self, appointment: Appointment) -> Self {
        self.appointments.save(&appointment).unwrap();
        self
    }

    pub fn deps(&self) -> Deps<'_> {
        Deps {
            offerings: &self.offerings,
            schedules: &self.schedules,
            appointments: &self.appointments,
            clock: &self.clock,
            ids: &self.ids,
            policy: self.policy,
        }
    }

    pub fn stored(&self, id: &str) -> Appointment {
        self.appointments
            .all()
            .into_iter()
            .find(|a| a.id == id)
            .unwrap_or_else(|| panic!("appointment {id} not stored"))
    }
}

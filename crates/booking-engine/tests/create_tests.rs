//! Tests for booking a new appointment.

mod common;

use booking_engine::{
    create_appointment, AppointmentStatus, BookingError, CreateAppointment, OfferingStatus,
    ScheduleException,
};
use chrono::{DateTime, Utc};
use common::*;

fn now() -> DateTime<Utc> {
    utc(2025, 1, 1, 9, 0)
}

fn request(start: DateTime<Utc>) -> CreateAppointment {
    CreateAppointment {
        schedule_id: "sch-1".into(),
        offering_id: "off-30".into(),
        customer_id: "cus-1".into(),
        start,
        notes: None,
    }
}

/// Wednesday 2025-01-01, open 09:00-18:00.
fn business_hours(buffer: u32) -> Fixture {
    Fixture::new(now())
        .with_offering(offering("off-30", 30))
        .with_schedule(schedule_for(now(), vec![window("09:00", "18:00")], buffer))
}

#[test]
fn creates_pending_appointment_on_free_future_slot() {
    let f = Fixture::new(now())
        .with_offering(offering("off-30", 30))
        .with_schedule(full_day_schedule_for(now(), 0));

    let appt = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap();

    assert_eq!(appt.id, "appt-new-1");
    assert_eq!(appt.start, utc(2025, 1, 1, 10, 0));
    assert_eq!(appt.end, utc(2025, 1, 1, 10, 30));
    assert_eq!(appt.status, AppointmentStatus::Pending);
    assert_eq!(appt.professional_id, "pro-1");
    assert_eq!(appt.customer_id, "cus-1");
    assert_eq!(appt.created_at, now());
    assert_eq!(appt.updated_at, now());
    assert!(appt.audit.is_empty());
    assert_eq!(f.stored("appt-new-1"), appt);
}

#[test]
fn start_must_be_strictly_in_the_future() {
    let f = business_hours(0);
    for start in [now(), utc(2024, 12, 31, 10, 0)] {
        let err = create_appointment(&f.deps(), request(start)).unwrap_err();
        assert_eq!(err, BookingError::PastAppointment);
    }
    assert!(f.appointments.all().is_empty());
}

#[test]
fn past_start_reported_before_missing_schedule() {
    let f = Fixture::new(now());
    let err = create_appointment(&f.deps(), request(now())).unwrap_err();
    assert_eq!(err.code(), "RULE_PAST_APPOINTMENT");
}

#[test]
fn fails_when_schedule_missing() {
    let f = Fixture::new(now()).with_offering(offering("off-30", 30));
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err, BookingError::ScheduleNotFound("sch-1".into()));
}

#[test]
fn fails_when_offering_missing() {
    let f = Fixture::new(now()).with_schedule(full_day_schedule_for(now(), 0));
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "OFFERING_NOT_FOUND");
}

#[test]
fn fails_when_offering_inactive() {
    let mut inactive = offering("off-30", 30);
    inactive.status = OfferingStatus::Inactive;
    let f = Fixture::new(now())
        .with_offering(inactive)
        .with_schedule(full_day_schedule_for(now(), 0));

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "OFFERING_INACTIVE");
    assert!(f.appointments.all().is_empty());
}

#[test]
fn fails_when_overlapping_existing_appointment() {
    let f = business_hours(0).with_appointment(appointment(
        "existing",
        utc(2025, 1, 1, 10, 0),
        utc(2025, 1, 1, 10, 30),
        AppointmentStatus::Confirmed,
    ));

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 15))).unwrap_err();
    assert_eq!(err, BookingError::OverlapAppointment);
    assert_eq!(f.appointments.all().len(), 1);
}

#[test]
fn fails_outside_availability() {
    let f = business_hours(0);
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 20, 0))).unwrap_err();
    assert_eq!(err.code(), "RULE_SLOT_OUT_OF_AVAILABILITY");

    // Straddles the 18:00 close
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 17, 45))).unwrap_err();
    assert_eq!(err.code(), "RULE_SLOT_OUT_OF_AVAILABILITY");

    // Thursday has no template
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 2, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "RULE_SLOT_OUT_OF_AVAILABILITY");
}

#[test]
fn buffer_rejects_back_to_back_booking() {
    let f = business_hours(10).with_appointment(appointment(
        "existing",
        utc(2025, 1, 1, 10, 0),
        utc(2025, 1, 1, 10, 30),
        AppointmentStatus::Pending,
    ));

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 30))).unwrap_err();
    assert_eq!(err.code(), "OVERLAP_APPOINTMENT");

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 9, 30))).unwrap_err();
    assert_eq!(err.code(), "OVERLAP_APPOINTMENT");
}

#[test]
fn buffer_allows_start_after_gap() {
    let f = business_hours(10).with_appointment(appointment(
        "existing",
        utc(2025, 1, 1, 10, 0),
        utc(2025, 1, 1, 10, 30),
        AppointmentStatus::Pending,
    ));

    let appt = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 40))).unwrap();
    assert_eq!(appt.end, utc(2025, 1, 1, 11, 10));

    let before = create_appointment(&f.deps(), request(utc(2025, 1, 1, 9, 20))).unwrap();
    assert_eq!(before.end, utc(2025, 1, 1, 9, 50));
}

#[test]
fn terminal_appointments_do_not_block() {
    let mut f = business_hours(10);
    for (id, status) in [
        ("cancelled", AppointmentStatus::Cancelled),
        ("attended", AppointmentStatus::Attended),
        ("no-show", AppointmentStatus::NoShow),
    ] {
        f = f.with_appointment(appointment(
            id,
            utc(2025, 1, 1, 10, 0),
            utc(2025, 1, 1, 10, 30),
            status,
        ));
    }

    let appt = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap();
    assert_eq!(appt.status, AppointmentStatus::Pending);
}

#[test]
fn closed_exception_rejects_slot() {
    let schedule = closed_on(
        schedule_for(now(), vec![window("09:00", "18:00")], 0),
        date(2025, 1, 1),
    );
    let f = Fixture::new(now())
        .with_offering(offering("off-30", 30))
        .with_schedule(schedule);

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "RULE_SLOT_OUT_OF_AVAILABILITY");
}

#[test]
fn open_exception_replaces_template_windows() {
    let mut schedule = schedule_for(now(), vec![window("09:00", "18:00")], 0);
    schedule.exceptions.push(ScheduleException {
        date: date(2025, 1, 1),
        available: true,
        windows: vec![window("19:00", "21:00")],
    });
    let f = Fixture::new(now())
        .with_offering(offering("off-30", 30))
        .with_schedule(schedule);

    let appt = create_appointment(&f.deps(), request(utc(2025, 1, 1, 20, 0))).unwrap();
    assert_eq!(appt.end, utc(2025, 1, 1, 20, 30));

    // Template hours no longer apply on that date
    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "RULE_SLOT_OUT_OF_AVAILABILITY");
}

#[test]
fn notes_are_kept() {
    let f = business_hours(0);
    let mut req = request(utc(2025, 1, 1, 11, 0));
    req.notes = Some("first visit".into());

    let appt = create_appointment(&f.deps(), req).unwrap();
    assert_eq!(appt.notes.as_deref(), Some("first visit"));
}

#[test]
fn ids_come_from_generator() {
    let f = business_hours(0);
    let a = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap();
    let b = create_appointment(&f.deps(), request(utc(2025, 1, 1, 11, 0))).unwrap();
    assert_eq!(a.id, "appt-new-1");
    assert_eq!(b.id, "appt-new-2");
}

#[test]
fn stored_schedule_is_validated() {
    let mut schedule = closed_on(
        schedule_for(now(), vec![window("09:00", "18:00")], 0),
        date(2025, 1, 1),
    );
    schedule.exceptions.push(ScheduleException {
        date: date(2025, 1, 1),
        available: true,
        windows: vec![window("09:00", "18:00")],
    });
    let f = Fixture::new(now())
        .with_offering(offering("off-30", 30))
        .with_schedule(schedule);

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "INVALID_SCHEDULE");
    assert!(f.appointments.all().is_empty());
}

#[test]
fn stored_offering_is_validated() {
    let f = Fixture::new(now())
        .with_offering(offering("off-30", 0))
        .with_schedule(full_day_schedule_for(now(), 0));

    let err = create_appointment(&f.deps(), request(utc(2025, 1, 1, 10, 0))).unwrap_err();
    assert_eq!(err.code(), "INVALID_OFFERING");
}

//! Booking use cases: create, list slots, confirm, cancel, reschedule.
//!
//! Every entry point takes plain request data and a [`Deps`] bundle of
//! ports; nothing is read from global state. All validation runs before the
//! first write, so a failed call leaves the repositories untouched.
//!
//! The engine performs no locking. Hosts serialize create and reschedule
//! calls per schedule (or rely on a storage-level exclusion constraint);
//! the conflict check alone cannot prevent two concurrent bookings.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::appointment::{Appointment, AppointmentStatus, AuditAction};
use crate::availability::is_within_availability;
use crate::conflict::{buffered_interval, has_conflict};
use crate::error::{BookingError, Result};
use crate::offering::Offering;
use crate::policy::{authorize, Actor, CancellationPolicy, Operation};
use crate::ports::{
    AppointmentRepository, Clock, IdGenerator, OfferingRepository, RangeQuery, ScheduleRepository,
};
use crate::schedule::Schedule;
use crate::slots::{generate_slots, Slot};
use crate::time_window::{add_minutes, date_key, start_of_date};

/// Ports and policy a use case runs against.
#[derive(Clone, Copy)]
pub struct Deps<'a> {
    pub offerings: &'a dyn OfferingRepository,
    pub schedules: &'a dyn ScheduleRepository,
    pub appointments: &'a dyn AppointmentRepository,
    pub clock: &'a dyn Clock,
    pub ids: &'a dyn IdGenerator,
    pub policy: CancellationPolicy,
}

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointment {
    pub schedule_id: String,
    pub offering_id: String,
    pub customer_id: String,
    pub start: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSlots {
    pub schedule_id: String,
    pub offering_id: String,
    /// Inclusive.
    pub from: DateTime<Utc>,
    /// Exclusive.
    pub to: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelAppointment {
    pub appointment_id: String,
    pub actor: Actor,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescheduleAppointment {
    pub appointment_id: String,
    pub new_start: DateTime<Utc>,
    pub actor: Actor,
    pub reason: Option<String>,
}

// ── Use cases ───────────────────────────────────────────────────────────────

/// Book a new `PENDING` appointment.
///
/// # Errors
///
/// In order of evaluation: `RULE_PAST_APPOINTMENT`, `SCHEDULE_NOT_FOUND`,
/// `INVALID_SCHEDULE`, `OFFERING_NOT_FOUND`, `INVALID_OFFERING`,
/// `OFFERING_INACTIVE`, `RULE_SLOT_OUT_OF_AVAILABILITY`,
/// `OVERLAP_APPOINTMENT`, plus `STORAGE_ERROR` from the ports.
pub fn create_appointment(deps: &Deps<'_>, request: CreateAppointment) -> Result<Appointment> {
    debug!(
        schedule_id = %request.schedule_id,
        offering_id = %request.offering_id,
        start = %request.start,
        "create appointment"
    );
    let schedule_id = request.schedule_id.clone();
    let booked = create(deps, request)
        .inspect_err(|e| warn!(code = e.code(), %schedule_id, "create rejected"))?;

    info!(
        appointment_id = %booked.id,
        schedule_id = %booked.schedule_id,
        start = %booked.start,
        "appointment created"
    );
    Ok(booked)
}

/// Free slots for an offering on a schedule within `[from, to)`.
///
/// # Errors
///
/// `SCHEDULE_NOT_FOUND`, `INVALID_SCHEDULE`, `OFFERING_NOT_FOUND`,
/// `INVALID_OFFERING`, `OFFERING_INACTIVE`, checked before any slot is
/// generated.
pub fn list_available_slots(deps: &Deps<'_>, request: ListSlots) -> Result<Vec<Slot>> {
    debug!(
        schedule_id = %request.schedule_id,
        offering_id = %request.offering_id,
        from = %request.from,
        to = %request.to,
        "list available slots"
    );
    let (schedule, offering) = load_bookable(deps, &request.schedule_id, &request.offering_id)?;
    if request.to <= request.from {
        return Ok(Vec::new());
    }

    // Widened by the buffer so bookings just outside the range still block
    // slots at its edges.
    let (from, to) = buffered_interval(request.from, request.to, schedule.buffer_minutes);
    let existing = deps
        .appointments
        .list_by_schedule_and_range(&RangeQuery::new(schedule.id.clone(), from, to))?;

    let slots = generate_slots(&schedule, &offering, request.from, request.to, &existing);
    debug!(schedule_id = %schedule.id, count = slots.len(), "slots generated");
    Ok(slots)
}

/// Free slots for one UTC calendar day.
pub fn list_slots_for_day(
    deps: &Deps<'_>,
    schedule_id: &str,
    offering_id: &str,
    day: NaiveDate,
) -> Result<Vec<Slot>> {
    let from = start_of_date(day);
    list_available_slots(
        deps,
        ListSlots {
            schedule_id: schedule_id.to_string(),
            offering_id: offering_id.to_string(),
            from,
            to: from + Duration::days(1),
        },
    )
}

/// `PENDING → CONFIRMED`.
///
/// # Errors
///
/// `APPOINTMENT_NOT_FOUND`, or `INVALID_STATUS_TRANSITION` for any status
/// other than `PENDING` (confirming twice fails the second time).
pub fn confirm_appointment(deps: &Deps<'_>, appointment_id: &str) -> Result<Appointment> {
    debug!(appointment_id, "confirm appointment");
    let mut appointment = load_appointment(deps, appointment_id)?;

    appointment
        .confirm(deps.clock.now())
        .inspect_err(|e| warn!(code = e.code(), appointment_id, "confirm rejected"))?;
    deps.appointments.save(&appointment)?;

    info!(appointment_id, "appointment confirmed");
    Ok(appointment)
}

/// Cancel a pending or confirmed appointment.
///
/// # Errors
///
/// `APPOINTMENT_NOT_FOUND`, `RULE_INVALID_TRANSITION` if already terminal
/// (cancelling twice fails the second time), `FORBIDDEN_CANCELLATION`,
/// `CANCEL_WINDOW_VIOLATION`.
pub fn cancel_appointment(deps: &Deps<'_>, request: CancelAppointment) -> Result<Appointment> {
    debug!(
        appointment_id = %request.appointment_id,
        actor_id = %request.actor.id,
        "cancel appointment"
    );
    let appointment_id = request.appointment_id.clone();
    let actor_id = request.actor.id.clone();
    let cancelled = cancel(deps, request)
        .inspect_err(|e| warn!(code = e.code(), %appointment_id, "cancel rejected"))?;

    info!(%appointment_id, %actor_id, "appointment cancelled");
    Ok(cancelled)
}

/// Move an appointment to `new_start`.
///
/// Runs the same checks as [`create_appointment`] for the new slot, cancels
/// the old appointment with a `RESCHEDULE` audit entry, then stores a new
/// `PENDING` appointment. If that last write fails the old appointment is
/// restored. The old appointment is left out of the conflict check, so the new
/// slot may overlap the one it replaces. Returns the new appointment; the old
/// one stays retrievable as `CANCELLED`.
///
/// # Errors
///
/// `APPOINTMENT_NOT_FOUND`, `RULE_INVALID_TRANSITION`, `FORBIDDEN_RESCHEDULE`,
/// `CANCEL_WINDOW_VIOLATION` (measured against the old start), then the
/// errors of [`create_appointment`].
pub fn reschedule_appointment(
    deps: &Deps<'_>,
    request: RescheduleAppointment,
) -> Result<Appointment> {
    debug!(
        appointment_id = %request.appointment_id,
        new_start = %request.new_start,
        actor_id = %request.actor.id,
        "reschedule appointment"
    );
    let old_id = request.appointment_id.clone();
    let replacement = reschedule(deps, request)
        .inspect_err(|e| warn!(code = e.code(), appointment_id = %old_id, "reschedule rejected"))?;

    info!(
        old_appointment_id = %old_id,
        appointment_id = %replacement.id,
        start = %replacement.start,
        "appointment rescheduled"
    );
    Ok(replacement)
}

// ── Internal helpers ────────────────────────────────────────────────────────

struct NewBooking<'r> {
    schedule: &'r Schedule,
    offering: &'r Offering,
    customer_id: &'r str,
    start: DateTime<Utc>,
    notes: Option<String>,
    now: DateTime<Utc>,
    /// Appointment being replaced, ignored by the conflict check.
    replacing: Option<&'r str>,
}

fn create(deps: &Deps<'_>, request: CreateAppointment) -> Result<Appointment> {
    let now = deps.clock.now();
    ensure_future(request.start, now)?;
    let (schedule, offering) = load_bookable(deps, &request.schedule_id, &request.offering_id)?;

    let appointment = prepare_booking(
        deps,
        NewBooking {
            schedule: &schedule,
            offering: &offering,
            customer_id: &request.customer_id,
            start: request.start,
            notes: request.notes,
            now,
            replacing: None,
        },
    )?;
    deps.appointments.create(&appointment)?;
    Ok(appointment)
}

fn cancel(deps: &Deps<'_>, request: CancelAppointment) -> Result<Appointment> {
    let now = deps.clock.now();
    let mut appointment = load_appointment(deps, &request.appointment_id)?;

    appointment.ensure_open()?;
    authorize(&request.actor, &appointment, Operation::Cancel)?;
    deps.policy.check_window(&request.actor, appointment.start, now)?;

    appointment.cancel(now, &request.actor.id, AuditAction::Cancel, request.reason)?;
    deps.appointments.update(&appointment)?;
    Ok(appointment)
}

fn reschedule(deps: &Deps<'_>, request: RescheduleAppointment) -> Result<Appointment> {
    let now = deps.clock.now();
    let old = load_appointment(deps, &request.appointment_id)?;

    old.ensure_open()?;
    authorize(&request.actor, &old, Operation::Reschedule)?;
    deps.policy.check_window(&request.actor, old.start, now)?;
    ensure_future(request.new_start, now)?;
    let (schedule, offering) = load_bookable(deps, &old.schedule_id, &old.offering_id)?;

    let mut cancelled = old.clone();
    cancelled.cancel(now, &request.actor.id, AuditAction::Reschedule, request.reason)?;

    let replacement = prepare_booking(
        deps,
        NewBooking {
            schedule: &schedule,
            offering: &offering,
            customer_id: &old.customer_id,
            start: request.new_start,
            notes: old.notes.clone(),
            now,
            replacing: Some(old.id.as_str()),
        },
    )?;

    // The old slot is released before the replacement is written, so a failed
    // write never leaves both appointments live.
    deps.appointments.update(&cancelled)?;
    if let Err(e) = deps.appointments.create(&replacement) {
        if let Err(restore) = deps.appointments.update(&old) {
            warn!(
                appointment_id = %old.id,
                code = restore.code(),
                "could not restore appointment after failed reschedule"
            );
        }
        return Err(e);
    }
    Ok(replacement)
}

fn ensure_future(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if start <= now {
        return Err(BookingError::PastAppointment);
    }
    Ok(())
}

fn load_appointment(deps: &Deps<'_>, id: &str) -> Result<Appointment> {
    deps.appointments
        .find_by_id(id)?
        .ok_or_else(|| BookingError::AppointmentNotFound(id.to_string()))
}

/// Schedule and offering for a booking, both structurally valid and the
/// offering active.
fn load_bookable(
    deps: &Deps<'_>,
    schedule_id: &str,
    offering_id: &str,
) -> Result<(Schedule, Offering)> {
    let schedule = deps
        .schedules
        .find_by_id(schedule_id)?
        .ok_or_else(|| BookingError::ScheduleNotFound(schedule_id.to_string()))?;
    schedule.validate()?;
    let offering = deps
        .offerings
        .find_by_id(offering_id)?
        .ok_or_else(|| BookingError::OfferingNotFound(offering_id.to_string()))?;
    offering.validate()?;
    offering.ensure_bookable()?;
    Ok((schedule, offering))
}

/// Availability and conflict checks for one slot. Returns the appointment to
/// store without writing it.
fn prepare_booking(deps: &Deps<'_>, booking: NewBooking<'_>) -> Result<Appointment> {
    let NewBooking {
        schedule,
        offering,
        customer_id,
        start,
        notes,
        now,
        replacing,
    } = booking;

    let end = add_minutes(start, i64::from(offering.duration_minutes));

    if !is_within_availability(schedule, start, end) {
        debug!(schedule_id = %schedule.id, day = %date_key(start), "slot outside availability");
        return Err(BookingError::SlotOutOfAvailability);
    }
    if has_conflict(
        deps.appointments,
        &schedule.id,
        start,
        end,
        schedule.buffer_minutes,
        replacing,
    )? {
        return Err(BookingError::OverlapAppointment);
    }

    let appointment = Appointment {
        id: deps.ids.next_id(),
        schedule_id: schedule.id.clone(),
        offering_id: offering.id.clone(),
        professional_id: schedule.professional_id.clone(),
        customer_id: customer_id.to_string(),
        start,
        end,
        status: AppointmentStatus::Pending,
        notes,
        audit: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    Ok(appointment)
}

//! Error types for booking-engine operations.
//!
//! Every failure the engine can report is a variant of [`BookingError`].
//! Callers branch on the variant (or on [`BookingError::kind`]) and forward
//! [`BookingError::code`] when they need a stable string.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("RULE_PAST_APPOINTMENT: appointment start must be in the future")]
    PastAppointment,

    #[error("SCHEDULE_NOT_FOUND: {0}")]
    ScheduleNotFound(String),

    #[error("OFFERING_NOT_FOUND: {0}")]
    OfferingNotFound(String),

    #[error("OFFERING_INACTIVE: {0}")]
    OfferingInactive(String),

    #[error("RULE_SLOT_OUT_OF_AVAILABILITY: slot is not inside an open window")]
    SlotOutOfAvailability,

    #[error("OVERLAP_APPOINTMENT: slot collides with an existing appointment")]
    OverlapAppointment,

    #[error("APPOINTMENT_NOT_FOUND: {0}")]
    AppointmentNotFound(String),

    /// Confirm on anything but a pending appointment.
    #[error("INVALID_STATUS_TRANSITION: cannot confirm a {0} appointment")]
    InvalidStatusTransition(String),

    /// Cancel or reschedule on a terminal appointment.
    #[error("RULE_INVALID_TRANSITION: appointment is already {0}")]
    InvalidTransition(String),

    #[error("FORBIDDEN_CANCELLATION: actor {0} may not cancel this appointment")]
    ForbiddenCancellation(String),

    #[error("FORBIDDEN_RESCHEDULE: actor {0} may not reschedule this appointment")]
    ForbiddenReschedule(String),

    #[error("CANCEL_WINDOW_VIOLATION: appointment starts within {0} hours")]
    CancelWindowViolation(u32),

    #[error("INVALID_TIME_FORMAT: '{0}'")]
    InvalidTimeFormat(String),

    #[error("INVALID_SCHEDULE: {0}")]
    InvalidSchedule(String),

    #[error("INVALID_OFFERING: {0}")]
    InvalidOffering(String),

    #[error("CONFIG_ERROR: {0}")]
    Config(String),

    /// A port (repository, clock, id generator) failed.
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),
}

/// Coarse classification of a [`BookingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Rule,
    Conflict,
    Forbidden,
    Invalid,
    Storage,
}

impl BookingError {
    /// The stable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            BookingError::PastAppointment => "RULE_PAST_APPOINTMENT",
            BookingError::ScheduleNotFound(_) => "SCHEDULE_NOT_FOUND",
            BookingError::OfferingNotFound(_) => "OFFERING_NOT_FOUND",
            BookingError::OfferingInactive(_) => "OFFERING_INACTIVE",
            BookingError::SlotOutOfAvailability => "RULE_SLOT_OUT_OF_AVAILABILITY",
            BookingError::OverlapAppointment => "OVERLAP_APPOINTMENT",
            BookingError::AppointmentNotFound(_) => "APPOINTMENT_NOT_FOUND",
            BookingError::InvalidStatusTransition(_) => "INVALID_STATUS_TRANSITION",
            BookingError::InvalidTransition(_) => "RULE_INVALID_TRANSITION",
            BookingError::ForbiddenCancellation(_) => "FORBIDDEN_CANCELLATION",
            BookingError::ForbiddenReschedule(_) => "FORBIDDEN_RESCHEDULE",
            BookingError::CancelWindowViolation(_) => "CANCEL_WINDOW_VIOLATION",
            BookingError::InvalidTimeFormat(_) => "INVALID_TIME_FORMAT",
            BookingError::InvalidSchedule(_) => "INVALID_SCHEDULE",
            BookingError::InvalidOffering(_) => "INVALID_OFFERING",
            BookingError::Config(_) => "CONFIG_ERROR",
            BookingError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::ScheduleNotFound(_)
            | BookingError::OfferingNotFound(_)
            | BookingError::AppointmentNotFound(_) => ErrorKind::NotFound,
            BookingError::PastAppointment
            | BookingError::OfferingInactive(_)
            | BookingError::SlotOutOfAvailability
            | BookingError::InvalidStatusTransition(_)
            | BookingError::InvalidTransition(_)
            | BookingError::CancelWindowViolation(_) => ErrorKind::Rule,
            BookingError::OverlapAppointment => ErrorKind::Conflict,
            BookingError::ForbiddenCancellation(_) | BookingError::ForbiddenReschedule(_) => {
                ErrorKind::Forbidden
            }
            BookingError::InvalidTimeFormat(_)
            | BookingError::InvalidSchedule(_)
            | BookingError::InvalidOffering(_)
            | BookingError::Config(_) => ErrorKind::Invalid,
            BookingError::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl Serialize for BookingError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BookingError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

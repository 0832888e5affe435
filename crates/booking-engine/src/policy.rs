//! Who may cancel or reschedule an appointment, and how late.
//!
//! Admins and assistants are privileged: they act on any appointment and
//! ignore the cancellation window. Users must be the appointment's customer
//! or professional and must act at least `cancel_min_hours` before it starts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::appointment::Appointment;
use crate::error::{BookingError, Result};
use crate::time_window::hours_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    User,
    Assistant,
}

impl ActorRole {
    pub fn is_privileged(self) -> bool {
        matches!(self, ActorRole::Admin | ActorRole::Assistant)
    }
}

/// The authenticated user performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Operations gated by [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Cancel,
    Reschedule,
}

/// Fails with the operation's forbidden error unless `actor` is privileged
/// or takes part in `appointment`.
pub fn authorize(actor: &Actor, appointment: &Appointment, operation: Operation) -> Result<()> {
    if actor.role.is_privileged() || appointment.is_participant(&actor.id) {
        return Ok(());
    }
    Err(match operation {
        Operation::Cancel => BookingError::ForbiddenCancellation(actor.id.clone()),
        Operation::Reschedule => BookingError::ForbiddenReschedule(actor.id.clone()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationPolicy {
    /// Minimum notice, in hours, a user must give to cancel or reschedule.
    pub cancel_min_hours: u32,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            cancel_min_hours: 24,
        }
    }
}

impl CancellationPolicy {
    pub fn new(cancel_min_hours: u32) -> Self {
        Self { cancel_min_hours }
    }

    /// Fails with [`BookingError::CancelWindowViolation`] when a non-privileged
    /// actor acts less than `cancel_min_hours` before `start`.
    pub fn check_window(
        &self,
        actor: &Actor,
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if actor.role.is_privileged() {
            return Ok(());
        }
        if hours_until(now, start) < f64::from(self.cancel_min_hours) {
            return Err(BookingError::CancelWindowViolation(self.cancel_min_hours));
        }
        Ok(())
    }
}

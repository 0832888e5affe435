//! Appointments and their status machine.
//!
//! ```text
//!             confirm           cancel
//!   PENDING ----------> CONFIRMED ----> CANCELLED
//!      |                    |
//!      +-------- cancel ----+
//! ```
//!
//! `ATTENDED` and `NO_SHOW` are set by operational flows outside this crate.
//! Together with `CANCELLED` they are terminal: no transition leaves them and
//! they no longer block the schedule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Attended,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Attended => "ATTENDED",
            AppointmentStatus::NoShow => "NO_SHOW",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::Attended | AppointmentStatus::NoShow
        )
    }

    /// Whether an appointment in this status occupies time on its schedule.
    pub fn blocks_schedule(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Cancel,
    Reschedule,
}

/// One entry of an appointment's append-only audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub at: DateTime<Utc>,
    pub by_user_id: String,
    pub action: AuditAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub schedule_id: String,
    pub offering_id: String,
    /// Copied from the schedule when the appointment is created.
    pub professional_id: String,
    pub customer_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub audit: Vec<AuditEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Whether `actor_id` is the customer or the professional of this appointment.
    pub fn is_participant(&self, actor_id: &str) -> bool {
        self.customer_id == actor_id || self.professional_id == actor_id
    }

    /// Fails with [`BookingError::InvalidTransition`] if the appointment is terminal.
    pub fn ensure_open(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(BookingError::InvalidTransition(self.status.to_string()));
        }
        Ok(())
    }

    /// `PENDING → CONFIRMED`. Any other starting status is rejected,
    /// including an already confirmed appointment.
    pub fn confirm(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.status != AppointmentStatus::Pending {
            return Err(BookingError::InvalidStatusTransition(self.status.to_string()));
        }
        self.status = AppointmentStatus::Confirmed;
        self.updated_at = now;
        Ok(())
    }

    /// Move a pending or confirmed appointment to `CANCELLED`, recording who
    /// did it and why in the audit log.
    pub fn cancel(
        &mut self,
        now: DateTime<Utc>,
        by_user_id: &str,
        action: AuditAction,
        reason: Option<String>,
    ) -> Result<()> {
        self.ensure_open()?;
        self.audit.push(AuditEvent {
            at: now,
            by_user_id: by_user_id.to_string(),
            action,
            reason,
        });
        self.status = AppointmentStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}

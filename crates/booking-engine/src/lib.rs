//! # booking-engine
//!
//! Appointment scheduling and availability for professional services.
//!
//! The engine decides whether a requested slot can be booked, lists free
//! slots for a date range, and drives appointments through their lifecycle
//! without ever double-booking a schedule. Persistence, the clock and id
//! generation are reached only through the traits in [`ports`].
//!
//! ## Modules
//!
//! - [`time_window`] — `"HH:MM"` parsing, day truncation and iteration on a single UTC timeline
//! - [`schedule`] — Weekly templates, date exceptions, buffers
//! - [`offering`] — Bookable services with a fixed duration
//! - [`appointment`] — Appointments, status machine, audit log
//! - [`availability`] — Open windows for a date (exceptions override the template)
//! - [`slots`] — Fixed-duration candidate slots filtered by buffered conflicts
//! - [`conflict`] — Buffered overlap checks against booked appointments
//! - [`policy`] — Roles, ownership and the cancellation window
//! - [`lifecycle`] — Create, list, confirm, cancel and reschedule use cases
//! - [`ports`] — Repository, clock and id-generator traits
//! - [`memory`] — In-memory port implementations
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod appointment;
pub mod availability;
pub mod config;
pub mod conflict;
pub mod error;
pub mod lifecycle;
pub mod memory;
pub mod offering;
pub mod policy;
pub mod ports;
pub mod schedule;
pub mod slots;
pub mod time_window;

pub use appointment::{Appointment, AppointmentStatus, AuditAction, AuditEvent};
pub use availability::{is_within_availability, resolve_windows};
pub use config::EngineConfig;
pub use conflict::has_conflict;
pub use error::{BookingError, ErrorKind};
pub use lifecycle::{
    cancel_appointment, confirm_appointment, create_appointment, list_available_slots,
    list_slots_for_day, reschedule_appointment, CancelAppointment, CreateAppointment, Deps,
    ListSlots, RescheduleAppointment,
};
pub use offering::{Offering, OfferingStatus};
pub use policy::{Actor, ActorRole, CancellationPolicy};
pub use ports::{
    AppointmentRepository, Clock, IdGenerator, OfferingRepository, RangeQuery, ScheduleRepository,
    SystemClock, UuidGenerator,
};
pub use schedule::{DailyWindow, Schedule, ScheduleException, WeeklyTemplateItem};
pub use slots::{generate_slots, Slot};
pub use time_window::{iterate_days, parse_time_of_day, TimeOfDay};

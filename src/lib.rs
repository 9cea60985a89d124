//! Time-slot availability and booking-conflict engine for meeting-room
//! scheduling.
//!
//! A working day is a fixed grid of granularity-sized slots
//! ([`engine::GridConfig`]). Given an immutable per-day snapshot of a
//! room's bookings ([`model::DaySchedule`]), the engine classifies each
//! slot as free or occupied and by whom ([`engine::classify`]), computes
//! highlight runs and candidate intervals for the booking flow
//! ([`engine::highlight_run`], [`engine::propose_interval`]), merges free
//! slots into maximal bookable ranges ([`engine::free_intervals`]), and
//! detects conflicts between a candidate and existing reservations
//! ([`engine::check`], [`engine::validate`]). All of it is pure functions
//! over explicit inputs: no caches, no globals, recompute per call.
//!
//! # Staleness and authority
//!
//! Conflict answers are computed over a snapshot that may be stale the
//! moment it arrives: two sessions can race to book the same room, each
//! passing its own local check. This engine's contract is to reject what
//! it can already see. The persistence store is the only authority that
//! can reject unconditionally and must enforce the overlap constraint
//! transactionally at write time. [`engine::Engine::validate_booking`]
//! re-fetches and re-checks immediately before submission, which narrows
//! the window but cannot close it.

pub mod engine;
pub mod model;
pub mod source;

pub use engine::{
    check, check_excluding, classify, classify_day, free_intervals, highlight_run,
    propose_interval, validate, validate_excluding, ConflictReport, DayView, Engine, GridConfig,
    ScheduleError, SlotAction, SlotStatus,
};
pub use model::{
    minutes_on, Booking, BookingStatus, DaySchedule, Minutes, RoomId, Slot, TimeSpan, ViewerId,
};
pub use source::{InMemoryScheduleSource, ScheduleSource};

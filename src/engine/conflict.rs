use chrono::NaiveDateTime;

use crate::model::{Booking, DaySchedule, TimeSpan};

use super::ScheduleError;

// ── Conflict detection ────────────────────────────────────────────

/// Derived, never persisted. Identical inputs always produce an identical
/// report; there is no hidden state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    pub has_conflict: bool,
    /// Every overlapping booking, in start order, so the caller can show a
    /// complete explanation rather than the first hit.
    pub conflicts: Vec<Booking>,
}

pub(crate) fn now_local() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// All active bookings overlapping the candidate. A booking conflicts iff
/// `candidate.start < booking.end && candidate.end > booking.start`, the
/// same strict predicate occupancy uses, so a candidate that merely touches
/// a reservation's boundary is clean.
pub fn check(candidate: &TimeSpan, schedule: &DaySchedule) -> ConflictReport {
    check_excluding(candidate, schedule, None)
}

/// Same scan, ignoring one booking id. For move/edit flows: a reservation
/// being moved must not conflict with itself.
pub fn check_excluding(
    candidate: &TimeSpan,
    schedule: &DaySchedule,
    exclude: Option<i64>,
) -> ConflictReport {
    let mut conflicts = Vec::new();
    for booking in schedule.overlapping(candidate) {
        if !booking.is_active() {
            continue;
        }
        if exclude == Some(booking.id) {
            continue;
        }
        conflicts.push(booking.clone());
    }
    ConflictReport {
        has_conflict: !conflicts.is_empty(),
        conflicts,
    }
}

/// Pre-submit gate over the raw form times. Checks, in order: positive
/// duration, start not already elapsed, no overlap. A candidate on a
/// future calendar date can never trip the past check, by construction.
/// Returns the well-formed candidate span on success.
pub fn validate(
    start: NaiveDateTime,
    end: NaiveDateTime,
    schedule: &DaySchedule,
    now: NaiveDateTime,
) -> Result<TimeSpan, ScheduleError> {
    validate_excluding(start, end, schedule, now, None)
}

pub fn validate_excluding(
    start: NaiveDateTime,
    end: NaiveDateTime,
    schedule: &DaySchedule,
    now: NaiveDateTime,
    exclude: Option<i64>,
) -> Result<TimeSpan, ScheduleError> {
    if start >= end {
        return Err(ScheduleError::InvalidInterval { start, end });
    }
    if start < now {
        return Err(ScheduleError::PastBooking { start });
    }
    let candidate = TimeSpan::new(start, end);
    let report = check_excluding(&candidate, schedule, exclude);
    if report.has_conflict {
        return Err(ScheduleError::Overlap(report.conflicts));
    }
    Ok(candidate)
}

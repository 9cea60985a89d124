use crate::model::{Booking, DaySchedule, Slot, ViewerId};

// ── Per-slot occupancy classification ─────────────────────────────

/// Status of one grid slot relative to the day's bookings and the viewer.
/// Occupied variants borrow the covering booking from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus<'a> {
    Free,
    OccupiedSelf(&'a Booking),
    OccupiedOther(&'a Booking),
}

impl<'a> SlotStatus<'a> {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotStatus::Free)
    }

    /// The covering booking, present iff the slot is occupied.
    pub fn booking(&self) -> Option<&'a Booking> {
        match self {
            SlotStatus::Free => None,
            SlotStatus::OccupiedSelf(b) | SlotStatus::OccupiedOther(b) => Some(b),
        }
    }
}

/// Classify one slot against the snapshot.
///
/// A booking covers the slot iff `booking.start < slot.end && booking.end >
/// slot.start`, strict on both sides: a booking ending exactly at the
/// slot's start leaves it free, as does one starting exactly at its end.
/// When several bookings cover the same slot (the store should prevent it,
/// but tolerate it) the first in start order wins. Cancelled bookings never
/// cover. Without a viewer, every covered slot is `OccupiedOther`.
///
/// Recomputed from scratch on every call; the status is a pure function of
/// the slot and the snapshot.
pub fn classify<'a>(
    slot: &Slot,
    schedule: &'a DaySchedule,
    viewer: Option<ViewerId>,
) -> SlotStatus<'a> {
    let span = slot.span_on(schedule.date);
    for booking in schedule.overlapping(&span) {
        if !booking.is_active() {
            continue;
        }
        return match viewer {
            Some(v) if booking.owned_by(v) => SlotStatus::OccupiedSelf(booking),
            _ => SlotStatus::OccupiedOther(booking),
        };
    }
    SlotStatus::Free
}

/// One render pass: statuses for every slot in grid order.
pub fn classify_day<'a>(
    slots: &[Slot],
    schedule: &'a DaySchedule,
    viewer: Option<ViewerId>,
) -> Vec<SlotStatus<'a>> {
    slots.iter().map(|s| classify(s, schedule, viewer)).collect()
}

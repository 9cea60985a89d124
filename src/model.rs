use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Minutes since local midnight — the grid's only time unit.
pub type Minutes = i64;

/// Numeric room identifier, as assigned by the store.
pub type RoomId = i64;

/// Instant `m` minutes after local midnight of `date`.
pub fn minutes_on(date: NaiveDate, m: Minutes) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::minutes(m)
}

/// Half-open interval `[start, end)` in naive local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start < end, "TimeSpan start must be before end");
        Self { start, end }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Strict on both sides: spans that merely touch do not overlap.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// A fixed-width unit of the canonical day grid, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: Minutes,
    pub end: Minutes,
}

impl Slot {
    /// This slot's wall-clock range on a concrete date.
    pub fn span_on(&self, date: NaiveDate) -> TimeSpan {
        TimeSpan::new(minutes_on(date, self.start), minutes_on(date, self.end))
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start / 60,
            self.start % 60,
            self.end / 60,
            self.end % 60
        )
    }
}

/// Lifecycle state of a reservation, as recorded by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Whether a booking in this status takes up room time. Pending blocks
    /// like confirmed; the store creates bookings as pending until its own
    /// commit completes.
    pub fn blocks(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// One reservation as read from the scheduling store. The engine never
/// mutates these; a schedule is an immutable snapshot for one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// The store's wire records carry this as `employee_id`.
    #[serde(alias = "employee_id")]
    pub owner_id: i64,
    pub title: String,
    pub status: BookingStatus,
}

impl Booking {
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start_time, self.end_time)
    }

    /// Cancelled bookings neither occupy slots nor count as conflicts.
    pub fn is_active(&self) -> bool {
        self.status.blocks()
    }

    pub fn owned_by(&self, viewer: ViewerId) -> bool {
        self.owner_id == viewer.0
    }
}

/// Canonical viewer identity. Session payloads carry ids loosely typed
/// (sometimes numeric, sometimes a numeric string); normalize exactly once,
/// here, where identity enters the engine. Everything downstream compares
/// plain equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(pub i64);

impl ViewerId {
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().map(Self)
    }
}

impl From<i64> for ViewerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Immutable snapshot of one room's bookings for one calendar day, sorted
/// by start time. Re-fetching produces a new snapshot; nothing updates one
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub room_id: RoomId,
    pub date: NaiveDate,
    bookings: Vec<Booking>,
}

impl DaySchedule {
    pub fn new(room_id: RoomId, date: NaiveDate, mut bookings: Vec<Booking>) -> Self {
        bookings.sort_by_key(|b| b.start_time);
        Self {
            room_id,
            date,
            bookings,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn find(&self, id: i64) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Bookings whose span overlaps the query window, in start order.
    /// Uses binary search to skip bookings starting at or after `query.end`.
    /// Status is not filtered here; callers skip cancelled records.
    pub fn overlapping(&self, query: &TimeSpan) -> impl Iterator<Item = &Booking> {
        let query = *query;
        // Everything at index >= right_bound starts at or after query.end → can't overlap.
        let right_bound = self
            .bookings
            .partition_point(|b| b.start_time < query.end);
        self.bookings[..right_bound]
            .iter()
            .filter(move |b| b.end_time > query.start)
    }
}

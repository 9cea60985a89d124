mod conflict;
mod error;
mod grid;
mod merge;
mod occupancy;

pub use conflict::{check, check_excluding, validate, validate_excluding, ConflictReport};
pub use error::ScheduleError;
pub use grid::{
    GridConfig, DEFAULT_DAY_END, DEFAULT_DAY_START, DEFAULT_GRANULARITY, MINUTES_PER_DAY,
};
pub use merge::{
    free_intervals, highlight_run, merge_spans, propose_interval, subtract_spans, SlotAction,
};
pub use occupancy::{classify, classify_day, SlotStatus};

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::model::{DaySchedule, RoomId, Slot, TimeSpan, ViewerId};
use crate::source::ScheduleSource;

/// Ties a schedule source to a grid configuration. Holds no schedule data
/// itself: every view and every validation works on a freshly fetched
/// snapshot.
pub struct Engine {
    source: Arc<dyn ScheduleSource>,
    grid: GridConfig,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("grid", &self.grid).finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(source: Arc<dyn ScheduleSource>, grid: GridConfig) -> Result<Self, ScheduleError> {
        grid.validate()?;
        Ok(Self { source, grid })
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    /// Fetch the room's bookings for `date` and build a detached snapshot
    /// view. The view stays valid after the requesting screen is gone; it
    /// is never updated in place, so callers re-fetch for fresh data.
    pub async fn day_view(
        &self,
        room_id: RoomId,
        date: NaiveDate,
        viewer: Option<ViewerId>,
    ) -> Result<DayView, ScheduleError> {
        let bookings = self.source.fetch_room_schedule(room_id, date).await?;
        debug!(room_id, %date, bookings = bookings.len(), "fetched room schedule");
        Ok(DayView {
            viewer,
            slots: self.grid.slots()?,
            schedule: DaySchedule::new(room_id, date, bookings),
        })
    }

    /// Re-validate `start..end` against a freshly fetched schedule. Run
    /// this immediately before the booking is persisted; any earlier check
    /// against a day view is a convenience over a possibly stale snapshot.
    ///
    /// Even this fresh check can lose a race against another session
    /// booking the same room concurrently. The store is the only authority
    /// that can reject unconditionally (a transactional overlap constraint
    /// at write time); this engine rejects what it can already see.
    ///
    /// `exclude` ignores one booking id, for move/edit submissions.
    pub async fn validate_booking(
        &self,
        room_id: RoomId,
        date: NaiveDate,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude: Option<i64>,
    ) -> Result<TimeSpan, ScheduleError> {
        let bookings = self.source.fetch_room_schedule(room_id, date).await?;
        let schedule = DaySchedule::new(room_id, date, bookings);
        match conflict::validate_excluding(start, end, &schedule, conflict::now_local(), exclude) {
            Ok(span) => Ok(span),
            Err(e) => {
                if matches!(e, ScheduleError::Overlap(_)) {
                    warn!(room_id, %date, "conflict at submit time: {e}");
                }
                Err(e)
            }
        }
    }
}

/// One room-day snapshot plus the canonical grid: everything a booking
/// screen needs, as plain data.
#[derive(Debug)]
pub struct DayView {
    pub viewer: Option<ViewerId>,
    pub slots: Vec<Slot>,
    pub schedule: DaySchedule,
}

impl DayView {
    /// Per-slot statuses for one render pass, in grid order.
    pub fn statuses(&self) -> Vec<SlotStatus<'_>> {
        classify_day(&self.slots, &self.schedule, self.viewer)
    }

    pub fn status_at(&self, index: usize) -> Option<SlotStatus<'_>> {
        self.slots
            .get(index)
            .map(|s| classify(s, &self.schedule, self.viewer))
    }

    pub fn highlight_run(&self, index: usize) -> Vec<usize> {
        highlight_run(&self.slots, index, &self.schedule, self.viewer)
    }

    pub fn propose(&self, index: usize) -> Option<SlotAction<'_>> {
        propose_interval(&self.slots, index, &self.schedule, self.viewer)
    }

    pub fn free_intervals(&self) -> Vec<TimeSpan> {
        free_intervals(&self.slots, &self.schedule)
    }

    /// Optimistic conflict check against this snapshot. Early feedback
    /// only; the submit path re-checks against a fresh fetch.
    pub fn check_candidate(&self, candidate: &TimeSpan) -> ConflictReport {
        check(candidate, &self.schedule)
    }
}

use crate::model::{minutes_on, Booking, DaySchedule, Slot, TimeSpan, ViewerId};

use super::occupancy::{classify, SlotStatus};

// ── Highlight runs and interval proposals ─────────────────────────

/// What selecting a slot should lead to. Pure data; the view layer decides
/// how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction<'a> {
    /// Offer this interval in the new-booking form.
    Propose(TimeSpan),
    /// The viewer's own reservation: show its management actions
    /// (view/move/edit) instead of a booking form.
    Manage(&'a Booking),
}

/// Indices to highlight when the slot at `index` is hovered or selected.
///
/// A free slot highlights itself plus the next slot iff that neighbor
/// exists and is free, signalling the default one-hour booking. An
/// occupied slot highlights the whole footprint of its covering booking.
/// Out-of-range indices highlight nothing.
pub fn highlight_run(
    slots: &[Slot],
    index: usize,
    schedule: &DaySchedule,
    viewer: Option<ViewerId>,
) -> Vec<usize> {
    let Some(slot) = slots.get(index) else {
        return Vec::new();
    };
    match classify(slot, schedule, viewer) {
        SlotStatus::Free => {
            let mut run = vec![index];
            if let Some(next) = slots.get(index + 1)
                && classify(next, schedule, viewer).is_free()
            {
                run.push(index + 1);
            }
            run
        }
        SlotStatus::OccupiedSelf(b) | SlotStatus::OccupiedOther(b) => {
            let footprint = b.span();
            slots
                .iter()
                .enumerate()
                .filter(|(_, s)| s.span_on(schedule.date).overlaps(&footprint))
                .map(|(i, _)| i)
                .collect()
        }
    }
}

/// Candidate interval (or management signal) for a click on `index`.
///
/// Free slot: extend one slot forward iff the neighbor is free, biasing
/// toward the common one-hour meeting; otherwise a single granularity
/// unit. Never crosses into occupied territory. Someone else's slot:
/// propose exactly that slot's range (conflict checking will then reject
/// the attempt with the full explanation). The viewer's own slot: manage
/// the existing booking instead.
pub fn propose_interval<'a>(
    slots: &[Slot],
    index: usize,
    schedule: &'a DaySchedule,
    viewer: Option<ViewerId>,
) -> Option<SlotAction<'a>> {
    let slot = slots.get(index)?;
    let action = match classify(slot, schedule, viewer) {
        SlotStatus::OccupiedSelf(b) => SlotAction::Manage(b),
        SlotStatus::OccupiedOther(_) => SlotAction::Propose(slot.span_on(schedule.date)),
        SlotStatus::Free => {
            let end = match slots.get(index + 1) {
                Some(next) if classify(next, schedule, viewer).is_free() => next.end,
                _ => slot.end,
            };
            SlotAction::Propose(TimeSpan::new(
                minutes_on(schedule.date, slot.start),
                minutes_on(schedule.date, end),
            ))
        }
    };
    Some(action)
}

// ── Free-interval computation ─────────────────────────────────────

/// Merge sorted spans that overlap or touch into disjoint maximal spans.
pub fn merge_spans(sorted: &[TimeSpan]) -> Vec<TimeSpan> {
    let mut merged: Vec<TimeSpan> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.start <= last.end
        {
            last.end = last.end.max(span.end);
            continue;
        }
        merged.push(span);
    }
    merged
}

/// Subtract `to_remove` from `base`. Both inputs sorted and disjoint.
pub fn subtract_spans(base: &[TimeSpan], to_remove: &[TimeSpan]) -> Vec<TimeSpan> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut cursor = b.start;

        while ri < to_remove.len() && to_remove[ri].end <= cursor {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < b.end {
            let r = &to_remove[j];
            if r.start > cursor {
                result.push(TimeSpan::new(cursor, r.start));
            }
            cursor = cursor.max(r.end);
            j += 1;
        }

        if cursor < b.end {
            result.push(TimeSpan::new(cursor, b.end));
        }
    }

    result
}

/// Maximal bookable ranges of the day: the grid window minus every active
/// booking, with bookings clamped to the window. Back-to-back reservations
/// coalesce into a single occupied block first, so each returned range is
/// genuinely bookable end to end.
pub fn free_intervals(slots: &[Slot], schedule: &DaySchedule) -> Vec<TimeSpan> {
    let (Some(first), Some(last)) = (slots.first(), slots.last()) else {
        return Vec::new();
    };
    let window = TimeSpan::new(
        minutes_on(schedule.date, first.start),
        minutes_on(schedule.date, last.end),
    );

    let mut booked: Vec<TimeSpan> = schedule
        .overlapping(&window)
        .filter(|b| b.is_active())
        .map(|b| {
            TimeSpan::new(
                b.start_time.max(window.start),
                b.end_time.min(window.end),
            )
        })
        .collect();
    booked.sort_by_key(|s| s.start);
    let booked = merge_spans(&booked);

    subtract_spans(&[window], &booked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GridConfig;
    use crate::model::BookingStatus;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn booking(id: i64, start: NaiveDateTime, end: NaiveDateTime, owner: i64) -> Booking {
        Booking {
            id,
            start_time: start,
            end_time: end,
            owner_id: owner,
            title: format!("booking {id}"),
            status: BookingStatus::Confirmed,
        }
    }

    fn slots() -> Vec<Slot> {
        GridConfig::default().slots().unwrap()
    }

    fn span(start: NaiveDateTime, end: NaiveDateTime) -> TimeSpan {
        TimeSpan::new(start, end)
    }

    // ── highlight_run ─────────────────────────────────────

    #[test]
    fn free_slot_highlights_pair() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        let run = highlight_run(&slots(), 12, &schedule, None); // 14:00
        assert_eq!(run, vec![12, 13]);
    }

    #[test]
    fn free_slot_before_occupied_highlights_alone() {
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(14, 30), at(15, 0), 7)]);
        let run = highlight_run(&slots(), 12, &schedule, None); // 14:00, next taken
        assert_eq!(run, vec![12]);
    }

    #[test]
    fn last_free_slot_highlights_alone() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        let run = highlight_run(&slots(), 25, &schedule, None); // 20:30, end of day
        assert_eq!(run, vec![25]);
    }

    #[test]
    fn occupied_slot_highlights_whole_footprint() {
        // One-hour booking covers two slots; hovering either highlights both.
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(10, 0), at(11, 0), 7)]);
        assert_eq!(highlight_run(&slots(), 4, &schedule, None), vec![4, 5]);
        assert_eq!(highlight_run(&slots(), 5, &schedule, None), vec![4, 5]);
    }

    #[test]
    fn single_slot_booking_highlights_one() {
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(9, 0), at(9, 30), 5)]);
        let run = highlight_run(&slots(), 2, &schedule, Some(ViewerId(5)));
        assert_eq!(run, vec![2]);
    }

    #[test]
    fn out_of_range_index_highlights_nothing() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        assert!(highlight_run(&slots(), 99, &schedule, None).is_empty());
    }

    // ── propose_interval ──────────────────────────────────

    #[test]
    fn free_pair_proposes_one_hour() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        let action = propose_interval(&slots(), 12, &schedule, None).unwrap(); // 14:00
        assert_eq!(action, SlotAction::Propose(span(at(14, 0), at(15, 0))));
    }

    #[test]
    fn blocked_neighbor_proposes_single_slot() {
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(14, 30), at(15, 0), 7)]);
        let action = propose_interval(&slots(), 12, &schedule, None).unwrap();
        assert_eq!(action, SlotAction::Propose(span(at(14, 0), at(14, 30))));
    }

    #[test]
    fn last_slot_proposes_single_slot() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        let action = propose_interval(&slots(), 25, &schedule, None).unwrap(); // 20:30
        assert_eq!(action, SlotAction::Propose(span(at(20, 30), at(21, 0))));
    }

    #[test]
    fn own_booking_proposes_management() {
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(10, 0), at(11, 0), 7)]);
        let action = propose_interval(&slots(), 4, &schedule, Some(ViewerId(7))).unwrap();
        assert!(matches!(action, SlotAction::Manage(b) if b.id == 1));
    }

    #[test]
    fn foreign_booking_proposes_exactly_that_slot() {
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(10, 0), at(11, 0), 7)]);
        let action = propose_interval(&slots(), 4, &schedule, Some(ViewerId(9))).unwrap();
        assert_eq!(action, SlotAction::Propose(span(at(10, 0), at(10, 30))));
    }

    #[test]
    fn out_of_range_index_proposes_nothing() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        assert!(propose_interval(&slots(), 99, &schedule, None).is_none());
    }

    // ── merge_spans / subtract_spans ──────────────────────

    #[test]
    fn merge_spans_overlapping_and_adjacent() {
        let spans = vec![
            span(at(9, 0), at(10, 0)),
            span(at(9, 30), at(10, 30)),
            span(at(10, 30), at(11, 0)),
            span(at(12, 0), at(13, 0)),
        ];
        assert_eq!(
            merge_spans(&spans),
            vec![span(at(9, 0), at(11, 0)), span(at(12, 0), at(13, 0))]
        );
    }

    #[test]
    fn subtract_middle_punch() {
        let base = vec![span(at(8, 0), at(21, 0))];
        let remove = vec![span(at(10, 0), at(11, 0))];
        assert_eq!(
            subtract_spans(&base, &remove),
            vec![span(at(8, 0), at(10, 0)), span(at(11, 0), at(21, 0))]
        );
    }

    #[test]
    fn subtract_full_cover() {
        let base = vec![span(at(10, 0), at(11, 0))];
        let remove = vec![span(at(9, 0), at(12, 0))];
        assert!(subtract_spans(&base, &remove).is_empty());
    }

    // ── free_intervals ────────────────────────────────────

    #[test]
    fn empty_day_is_one_free_interval() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        assert_eq!(
            free_intervals(&slots(), &schedule),
            vec![span(at(8, 0), at(21, 0))]
        );
    }

    #[test]
    fn bookings_punch_holes() {
        let schedule = DaySchedule::new(
            1,
            date(),
            vec![
                booking(1, at(10, 0), at(11, 0), 7),
                booking(2, at(15, 0), at(15, 30), 8),
            ],
        );
        assert_eq!(
            free_intervals(&slots(), &schedule),
            vec![
                span(at(8, 0), at(10, 0)),
                span(at(11, 0), at(15, 0)),
                span(at(15, 30), at(21, 0)),
            ]
        );
    }

    #[test]
    fn back_to_back_bookings_form_one_block() {
        let schedule = DaySchedule::new(
            1,
            date(),
            vec![
                booking(1, at(10, 0), at(11, 0), 7),
                booking(2, at(11, 0), at(12, 0), 8),
            ],
        );
        assert_eq!(
            free_intervals(&slots(), &schedule),
            vec![span(at(8, 0), at(10, 0)), span(at(12, 0), at(21, 0))]
        );
    }

    #[test]
    fn booking_outside_window_is_clamped() {
        // Early booking spilling into the window from before opening time.
        let schedule = DaySchedule::new(1, date(), vec![booking(1, at(7, 0), at(9, 0), 7)]);
        assert_eq!(
            free_intervals(&slots(), &schedule),
            vec![span(at(9, 0), at(21, 0))]
        );
    }

    #[test]
    fn cancelled_booking_leaves_day_free() {
        let mut cancelled = booking(1, at(10, 0), at(11, 0), 7);
        cancelled.status = BookingStatus::Cancelled;
        let schedule = DaySchedule::new(1, date(), vec![cancelled]);
        assert_eq!(
            free_intervals(&slots(), &schedule),
            vec![span(at(8, 0), at(21, 0))]
        );
    }

    #[test]
    fn no_slots_no_intervals() {
        let schedule = DaySchedule::new(1, date(), vec![]);
        assert!(free_intervals(&[], &schedule).is_empty());
    }
}

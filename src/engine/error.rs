use chrono::NaiveDateTime;

use crate::model::Booking;

/// Every failure the engine can report. Callers render distinct messages
/// per variant; none of these is fatal to the process.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// Bad grid parameters (window bounds, granularity).
    InvalidConfiguration(&'static str),
    /// Candidate with zero or negative duration.
    InvalidInterval {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Candidate start already elapsed at check time.
    PastBooking { start: NaiveDateTime },
    /// Candidate overlaps existing reservations; carries every one of them.
    Overlap(Vec<Booking>),
    /// The schedule source failed to produce a snapshot.
    Source(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::InvalidConfiguration(msg) => {
                write!(f, "invalid grid configuration: {msg}")
            }
            ScheduleError::InvalidInterval { start, end } => {
                write!(f, "invalid interval: start {start} is not before end {end}")
            }
            ScheduleError::PastBooking { start } => {
                write!(f, "start time {start} has already passed")
            }
            ScheduleError::Overlap(conflicts) => {
                write!(f, "conflicts with {} existing booking(s): ", conflicts.len())?;
                for (i, b) in conflicts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(
                        f,
                        "\"{}\" {}-{}",
                        b.title,
                        b.start_time.format("%H:%M"),
                        b.end_time.format("%H:%M")
                    )?;
                }
                Ok(())
            }
            ScheduleError::Source(e) => write!(f, "schedule source error: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::engine::ScheduleError;
use crate::model::{Booking, RoomId};

/// Read-side boundary to the store that owns bookings. Implementations
/// return every booking for one room on one calendar date; the engine
/// treats the result as an immutable snapshot.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn fetch_room_schedule(
        &self,
        room_id: RoomId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, ScheduleError>;
}

/// In-memory schedule store, for tests and embedding. Hands out cloned
/// snapshots; mutating it never changes a snapshot already fetched.
pub struct InMemoryScheduleSource {
    days: DashMap<(RoomId, NaiveDate), Arc<RwLock<Vec<Booking>>>>,
}

impl InMemoryScheduleSource {
    pub fn new() -> Self {
        Self {
            days: DashMap::new(),
        }
    }

    pub async fn insert(&self, room_id: RoomId, date: NaiveDate, booking: Booking) {
        let day = {
            let entry = self
                .days
                .entry((room_id, date))
                .or_insert_with(|| Arc::new(RwLock::new(Vec::new())));
            entry.value().clone()
        };
        day.write().await.push(booking);
    }

    /// Remove a booking by id. Returns whether anything was removed.
    pub async fn remove(&self, room_id: RoomId, date: NaiveDate, booking_id: i64) -> bool {
        let Some(day) = self.days.get(&(room_id, date)).map(|e| e.value().clone()) else {
            return false;
        };
        let mut bookings = day.write().await;
        let before = bookings.len();
        bookings.retain(|b| b.id != booking_id);
        bookings.len() < before
    }
}

impl Default for InMemoryScheduleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleSource for InMemoryScheduleSource {
    async fn fetch_room_schedule(
        &self,
        room_id: RoomId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, ScheduleError> {
        let Some(day) = self.days.get(&(room_id, date)).map(|e| e.value().clone()) else {
            return Ok(Vec::new());
        };
        let snapshot = day.read().await.clone();
        Ok(snapshot)
    }
}

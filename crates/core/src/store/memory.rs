//! Process-local store used by tests and local development.
//!
//! All state sits behind one mutex, so every trait method is a single atomic
//! step. The guard is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{BookingStore, SlotStore};
use crate::errors::{BookingError, BookingResult};
use crate::models::booking::{Booking, BookingStatus, ClientDetails};
use crate::models::time_slot::{NewTimeSlot, TimeSlot};

#[derive(Debug, Default)]
struct MemoryState {
    slots: HashMap<Uuid, TimeSlot>,
    bookings: HashMap<Uuid, Booking>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> BookingResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| BookingError::Internal("memory store lock poisoned".into()))
    }

    /// Every stored slot, ordered by start. Intended for assertions.
    pub fn snapshot_slots(&self) -> BookingResult<Vec<TimeSlot>> {
        let state = self.state()?;
        Ok(sorted_by_start(state.slots.values().cloned().collect()))
    }
}

fn sorted_by_start(mut slots: Vec<TimeSlot>) -> Vec<TimeSlot> {
    slots.sort_by_key(|slot| slot.start_time);
    slots
}

fn sorted_bookings(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by_key(|booking| (booking.start_time, booking.created_at));
    bookings
}

#[async_trait]
impl SlotStore for MemoryStore {
    async fn insert_slot(&self, slot: NewTimeSlot) -> BookingResult<TimeSlot> {
        let mut state = self.state()?;

        if let Some(existing) = state
            .slots
            .values()
            .find(|existing| existing.overlaps(slot.start_time, slot.end_time))
        {
            return Err(BookingError::SlotClash(format!(
                "Overlaps existing slot {}",
                existing.id
            )));
        }

        let stored = TimeSlot {
            id: Uuid::new_v4(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_booked: false,
            booking: None,
            created_at: Utc::now(),
        };
        state.slots.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>> {
        let state = self.state()?;
        Ok(sorted_by_start(
            state
                .slots
                .values()
                .filter(|slot| slot.overlaps(start, end))
                .cloned()
                .collect(),
        ))
    }

    async fn get_slot(&self, id: Uuid) -> BookingResult<Option<TimeSlot>> {
        Ok(self.state()?.slots.get(&id).cloned())
    }

    async fn find_slot_by_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Option<TimeSlot>> {
        let state = self.state()?;
        Ok(state
            .slots
            .values()
            .find(|slot| slot.matches_window(start, end))
            .cloned())
    }

    async fn delete_free_slot(&self, id: Uuid) -> BookingResult<bool> {
        let mut state = self.state()?;
        match state.slots.get(&id) {
            Some(slot) if !slot.is_booked => {
                state.slots.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_slots_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>> {
        let state = self.state()?;
        Ok(sorted_by_start(
            state
                .slots
                .values()
                .filter(|slot| slot.start_time >= from && slot.start_time < to)
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn reserve_slot(
        &self,
        slot: &TimeSlot,
        client: &ClientDetails,
    ) -> BookingResult<Option<Booking>> {
        let mut state = self.state()?;

        let Some(stored) = state.slots.get_mut(&slot.id) else {
            return Ok(None);
        };
        if stored.is_booked {
            return Ok(None);
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            slot_id: stored.id,
            start_time: stored.start_time,
            end_time: stored.end_time,
            client: client.clone(),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };
        stored.is_booked = true;
        stored.booking = Some(booking.id);
        state.bookings.insert(booking.id, booking.clone());

        Ok(Some(booking))
    }

    async fn release_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let mut state = self.state()?;

        let Some(booking) = state.bookings.remove(&id) else {
            return Ok(None);
        };
        if let Some(slot) = state.slots.get_mut(&booking.slot_id) {
            slot.is_booked = false;
            slot.booking = None;
        }

        Ok(Some(booking))
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        Ok(self.state()?.bookings.get(&id).cloned())
    }

    async fn list_bookings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>> {
        let state = self.state()?;
        Ok(sorted_bookings(
            state
                .bookings
                .values()
                .filter(|booking| booking.start_time >= from && booking.start_time < to)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all_bookings(&self) -> BookingResult<Vec<Booking>> {
        let state = self.state()?;
        Ok(sorted_bookings(state.bookings.values().cloned().collect()))
    }
}

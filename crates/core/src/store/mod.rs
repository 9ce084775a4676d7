//! Persistence seams for slots and bookings.
//!
//! Managers only talk to these traits. Implementations must make
//! [`BookingStore::reserve_slot`] and [`BookingStore::release_booking`]
//! atomic: the slot flag and the booking record change together or not at
//! all.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::booking::{Booking, ClientDetails};
use crate::models::time_slot::{NewTimeSlot, TimeSlot};

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Persists a free slot. Fails with `SlotClash` if the store itself
    /// detects an overlap with an existing slot.
    async fn insert_slot(&self, slot: NewTimeSlot) -> BookingResult<TimeSlot>;

    /// Slots whose `[start, end)` intersects the given interval.
    async fn find_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>>;

    async fn get_slot(&self, id: Uuid) -> BookingResult<Option<TimeSlot>>;

    /// The slot with exactly this window, if one exists.
    async fn find_slot_by_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Option<TimeSlot>>;

    /// Deletes the slot only if it is not booked. Returns whether a row was
    /// removed.
    async fn delete_free_slot(&self, id: Uuid) -> BookingResult<bool>;

    /// Slots starting in `[from, to)`, ordered by start ascending.
    async fn list_slots_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Flips the slot to booked if, and only if, it is still free, and
    /// records the booking in the same unit of work. Returns `None` when the
    /// slot was already booked or no longer exists.
    async fn reserve_slot(
        &self,
        slot: &TimeSlot,
        client: &ClientDetails,
    ) -> BookingResult<Option<Booking>>;

    /// Removes the booking and frees its slot. Returns the removed booking,
    /// or `None` if it did not exist.
    async fn release_booking(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    /// Bookings whose slot starts in `[from, to)`, ordered by start ascending.
    async fn list_bookings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>>;

    /// Every booking, ordered by start ascending.
    async fn list_all_bookings(&self) -> BookingResult<Vec<Booking>>;
}

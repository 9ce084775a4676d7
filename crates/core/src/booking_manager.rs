use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::business_time::BusinessTime;
use crate::errors::{BookingError, BookingResult};
use crate::models::booking::{Booking, BookingStatus, CreateBookingRequest};
use crate::store::{BookingStore, SlotStore};

/// Books free slots for clients and cancels those bookings.
#[derive(Clone)]
pub struct BookingManager {
    slots: Arc<dyn SlotStore>,
    bookings: Arc<dyn BookingStore>,
    time: BusinessTime,
}

impl BookingManager {
    pub fn new(
        slots: Arc<dyn SlotStore>,
        bookings: Arc<dyn BookingStore>,
        time: BusinessTime,
    ) -> Self {
        Self {
            slots,
            bookings,
            time,
        }
    }

    pub fn business_time(&self) -> &BusinessTime {
        &self.time
    }

    /// Books the slot matching the requested date and time range.
    ///
    /// The decisive check is the store's conditional reservation, so of any
    /// number of concurrent requests for one slot exactly one succeeds.
    ///
    /// # Errors
    ///
    /// * `BookingError::Validation` - a client field is empty
    /// * `BookingError::InvalidRange` - unparsable date or times
    /// * `BookingError::NotFound` - no slot has exactly this window
    /// * `BookingError::AlreadyBooked` - the slot is taken
    pub async fn create_booking(&self, request: &CreateBookingRequest) -> BookingResult<Booking> {
        let client = request.client_details().validated()?;
        let window = self
            .time
            .window(&request.date, &request.time_start, &request.time_end)?;

        let slot = self
            .slots
            .find_slot_by_window(window.start, window.end)
            .await?
            .ok_or_else(|| {
                BookingError::NotFound(format!(
                    "No time slot on {} from {} to {}",
                    window.date,
                    request.time_start.trim(),
                    request.time_end.trim()
                ))
            })?;

        if slot.is_booked {
            warn!(slot_id = %slot.id, "Rejected booking of taken slot");
            return Err(already_booked(&slot.id));
        }

        match self.bookings.reserve_slot(&slot, &client).await? {
            Some(booking) => {
                info!(booking_id = %booking.id, slot_id = %slot.id, "Booking confirmed");
                Ok(booking)
            }
            None => {
                // Lost the conditional update; tell apart a competing booking
                // from a slot deleted underneath us.
                warn!(slot_id = %slot.id, "Slot reservation lost to a concurrent request");
                match self.slots.get_slot(slot.id).await? {
                    Some(_) => Err(already_booked(&slot.id)),
                    None => Err(BookingError::NotFound(format!(
                        "Time slot with ID {} not found",
                        slot.id
                    ))),
                }
            }
        }
    }

    /// Removes a booking and frees its slot. Returns the booking as it was,
    /// marked cancelled.
    pub async fn cancel_booking(&self, id: Uuid) -> BookingResult<Booking> {
        let mut booking = self
            .bookings
            .release_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(&id))?;

        booking.status = BookingStatus::Cancelled;
        info!(booking_id = %id, slot_id = %booking.slot_id, "Booking cancelled");
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> BookingResult<Booking> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| booking_not_found(&id))
    }

    /// Bookings on the given business-local date, earliest first.
    pub async fn list_bookings_by_date(&self, date: &str) -> BookingResult<Vec<Booking>> {
        let date = self.time.parse_date(date)?;
        let (from, to) = self.time.day_bounds(date)?;
        self.bookings.list_bookings_between(from, to).await
    }

    pub async fn list_all_bookings(&self) -> BookingResult<Vec<Booking>> {
        self.bookings.list_all_bookings().await
    }
}

fn already_booked(slot_id: &Uuid) -> BookingError {
    BookingError::AlreadyBooked(format!("Time slot {} is already booked", slot_id))
}

fn booking_not_found(id: &Uuid) -> BookingError {
    BookingError::NotFound(format!("Booking with ID {} not found", id))
}

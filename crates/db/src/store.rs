//! PostgreSQL implementation of the store traits.
//!
//! Reservation and release run inside a transaction; the free-to-booked flip
//! is a conditional `UPDATE`, so row locking decides which of several
//! concurrent reservations wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::errors::{BookingError, BookingResult};
use slotbook_core::models::booking::{Booking, ClientDetails};
use slotbook_core::models::time_slot::{NewTimeSlot, TimeSlot};
use slotbook_core::store::{BookingStore, SlotStore};
use tracing::debug;
use uuid::Uuid;

use crate::repositories::{booking, time_slot};
use crate::DbPool;

const UNIQUE_VIOLATION: &str = "23505";
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn sql_error(err: sqlx::Error) -> BookingError {
    BookingError::Database(err.into())
}

/// True when the report wraps a Postgres unique or exclusion violation.
fn is_overlap_violation(err: &eyre::Report) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION || code == EXCLUSION_VIOLATION)
}

fn into_bookings(rows: Vec<crate::models::DbBooking>) -> BookingResult<Vec<Booking>> {
    rows.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl SlotStore for PgStore {
    async fn insert_slot(&self, slot: NewTimeSlot) -> BookingResult<TimeSlot> {
        match time_slot::create_time_slot(&self.pool, slot.start_time, slot.end_time).await {
            Ok(row) => Ok(row.into()),
            Err(err) if is_overlap_violation(&err) => Err(BookingError::SlotClash(format!(
                "{} - {} overlaps an existing slot",
                slot.start_time, slot.end_time
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>> {
        let rows = time_slot::get_overlapping_time_slots(&self.pool, start, end).await?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }

    async fn get_slot(&self, id: Uuid) -> BookingResult<Option<TimeSlot>> {
        let row = time_slot::get_time_slot_by_id(&self.pool, id).await?;
        Ok(row.map(TimeSlot::from))
    }

    async fn find_slot_by_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<Option<TimeSlot>> {
        let row = time_slot::get_time_slot_by_window(&self.pool, start, end).await?;
        Ok(row.map(TimeSlot::from))
    }

    async fn delete_free_slot(&self, id: Uuid) -> BookingResult<bool> {
        Ok(time_slot::delete_free_time_slot(&self.pool, id).await?)
    }

    async fn list_slots_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<TimeSlot>> {
        let rows = time_slot::get_time_slots_between(&self.pool, from, to).await?;
        Ok(rows.into_iter().map(TimeSlot::from).collect())
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn reserve_slot(
        &self,
        slot: &TimeSlot,
        client: &ClientDetails,
    ) -> BookingResult<Option<Booking>> {
        let mut tx = self.pool.begin().await.map_err(sql_error)?;

        if !time_slot::mark_time_slot_booked(&mut *tx, slot.id).await? {
            debug!(slot_id = %slot.id, "Conditional booking update matched no rows");
            tx.rollback().await.map_err(sql_error)?;
            return Ok(None);
        }

        let row = booking::create_booking(&mut *tx, slot.id, client).await?;
        tx.commit().await.map_err(sql_error)?;

        Ok(Some(row.try_into()?))
    }

    async fn release_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let mut tx = self.pool.begin().await.map_err(sql_error)?;

        let Some(row) = booking::delete_booking(&mut *tx, id).await? else {
            tx.rollback().await.map_err(sql_error)?;
            return Ok(None);
        };
        time_slot::mark_time_slot_free(&mut *tx, row.slot_id).await?;
        tx.commit().await.map_err(sql_error)?;

        Ok(Some(row.try_into()?))
    }

    async fn get_booking(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_bookings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> BookingResult<Vec<Booking>> {
        into_bookings(booking::get_bookings_between(&self.pool, from, to).await?)
    }

    async fn list_all_bookings(&self) -> BookingResult<Vec<Booking>> {
        into_bookings(booking::get_all_bookings(&self.pool).await?)
    }
}

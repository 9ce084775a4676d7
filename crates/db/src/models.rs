use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::errors::BookingError;
use slotbook_core::models::booking::{Booking, ClientDetails};
use slotbook_core::models::time_slot::TimeSlot;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    /// Joined from `bookings.slot_id`.
    pub booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        Self {
            id: row.id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_booked: row.is_booked,
            booking: row.booking_id,
            created_at: row.created_at,
        }
    }
}

/// A booking row joined with the window of the slot it references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub service: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = BookingError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            slot_id: row.slot_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse()?,
            client: ClientDetails {
                name: row.name,
                email: row.email,
                phone: row.phone,
                location: row.location,
                service: row.service,
            },
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use slotbook_core::models::booking::BookingStatus;

    fn row(status: &str) -> DbBooking {
        let start_time = Utc::now();
        DbBooking {
            id: Uuid::new_v4(),
            slot_id: Uuid::new_v4(),
            start_time,
            end_time: start_time + Duration::minutes(30),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: "1234567890".to_string(),
            location: "NY".to_string(),
            service: "SEO".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn booking_row_maps_to_domain() {
        let db_row = row("confirmed");
        let booking = Booking::try_from(db_row.clone()).unwrap();

        assert_eq!(booking.id, db_row.id);
        assert_eq!(booking.slot_id, db_row.slot_id);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.client.service, "SEO");
    }

    #[test]
    fn unknown_status_fails_conversion() {
        assert!(Booking::try_from(row("pending")).is_err());
    }

    #[test]
    fn slot_row_carries_joined_booking() {
        let booking_id = Uuid::new_v4();
        let start_time = Utc::now();
        let slot: TimeSlot = DbTimeSlot {
            id: Uuid::new_v4(),
            start_time,
            end_time: start_time + Duration::minutes(30),
            is_booked: true,
            booking_id: Some(booking_id),
            created_at: Utc::now(),
        }
        .into();

        assert!(slot.is_booked);
        assert_eq!(slot.booking, Some(booking_id));
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::business_time::BusinessTime;
use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(BookingError::Internal(
                format!("Unknown booking status '{}'", other).into(),
            )),
        }
    }
}

/// Contact and request details supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub service: String,
}

impl ClientDetails {
    /// Trims every field and rejects the details if any field is empty.
    pub fn validated(self) -> BookingResult<Self> {
        let details = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            location: self.location.trim().to_string(),
            service: self.service.trim().to_string(),
        };

        let missing: Vec<&str> = [
            ("name", &details.name),
            ("email", &details.email),
            ("phone", &details.phone),
            ("location", &details.location),
            ("service", &details.service),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(BookingError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(details)
    }
}

/// A reservation of one time slot. The window is read from the slot it
/// references, never stored on the booking itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client: ClientDetails,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub location: String,
}

impl CreateBookingRequest {
    pub fn client_details(&self) -> ClientDetails {
        ClientDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            location: self.location.clone(),
            service: self.service.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    #[serde(rename = "startTimeUTC")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTimeUTC")]
    pub end_time: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub service: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingResponse {
    pub fn new(booking: Booking, time: &BusinessTime) -> Self {
        let ClientDetails {
            name,
            email,
            phone,
            location,
            service,
        } = booking.client;

        Self {
            id: booking.id,
            slot_id: booking.slot_id,
            date: time.local_date(booking.start_time),
            time_start: time.local_time_label(booking.start_time),
            time_end: time.local_time_label(booking.end_time),
            start_time: booking.start_time,
            end_time: booking.end_time,
            name,
            email,
            phone,
            location,
            service,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

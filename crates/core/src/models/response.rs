//! JSON envelopes shared by every endpoint: `{success, message?, <payload>?}`.

use serde::{Deserialize, Serialize};

use super::booking::BookingResponse;
use super::time_slot::TimeSlotResponse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub success: bool,
    pub slots: Vec<TimeSlotResponse>,
}

impl SlotsResponse {
    pub fn new(slots: Vec<TimeSlotResponse>) -> Self {
        Self {
            success: true,
            slots,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<BookingResponse>,
}

impl BookingsResponse {
    pub fn new(bookings: Vec<BookingResponse>) -> Self {
        Self {
            success: true,
            bookings,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::business_time::{BusinessTime, SlotWindow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    #[serde(rename = "startTimeUTC")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTimeUTC")]
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    /// Booking occupying this slot, if any.
    pub booking: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Half-open interval overlap against `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    pub fn matches_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time == start && self.end_time == end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTimeSlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<SlotWindow> for NewTimeSlot {
    fn from(window: SlotWindow) -> Self {
        Self {
            start_time: window.start,
            end_time: window.end,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSlotRequest {
    pub date: String,
    pub time_start: String,
    pub time_end: String,
}

/// A slot as presented to clients, with business-local labels next to the
/// stored UTC instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotResponse {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_start: String,
    pub time_end: String,
    #[serde(rename = "startTimeUTC")]
    pub start_time: DateTime<Utc>,
    #[serde(rename = "endTimeUTC")]
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub booking: Option<Uuid>,
}

impl TimeSlotResponse {
    pub fn new(slot: TimeSlot, time: &BusinessTime) -> Self {
        Self {
            id: slot.id,
            date: time.local_date(slot.start_time),
            time_start: time.local_time_label(slot.start_time),
            time_end: time.local_time_label(slot.end_time),
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_booked: slot.is_booked,
            booking: slot.booking,
        }
    }
}

/// Slots starting on one business-local date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlotResponse>,
}

impl DaySlotsResponse {
    pub fn new(day: DaySlots, time: &BusinessTime) -> Self {
        Self {
            date: day.date,
            slots: day
                .slots
                .into_iter()
                .map(|slot| TimeSlotResponse::new(slot, time))
                .collect(),
        }
    }
}

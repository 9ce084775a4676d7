//! # Time Slot Handlers
//!
//! Admin endpoints for creating and removing bookable slots, plus the public
//! listings by date and for the coming week.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use slotbook_core::models::{
    response::{DataResponse, MessageResponse, SlotsResponse},
    time_slot::{CreateTimeSlotRequest, DaySlotsResponse, TimeSlotResponse},
};
use std::sync::Arc;

use super::parse_id;
use crate::{middleware::error_handling::AppError, ApiState};

/// Creates a slot from `{date, timeStart, timeEnd}` in business-local time.
///
/// # Errors
///
/// * `BookingError::Validation` - body missing or not a slot request (400)
/// * `BookingError::InvalidRange` - malformed input or end not after start (400)
/// * `BookingError::SlotClash` - overlaps an existing slot (400)
#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateTimeSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<TimeSlotResponse>>), AppError> {
    let Json(payload) = payload?;
    let slot = state
        .slots
        .create_slot(&payload.date, &payload.time_start, &payload.time_end)
        .await?;

    let response = DataResponse::with_message(
        "Time slot created",
        TimeSlotResponse::new(slot, &state.time),
    );
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn get_slots_by_date(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<SlotsResponse>, AppError> {
    let slots = state.slots.list_slots_by_date(&date).await?;

    Ok(Json(SlotsResponse::new(
        slots
            .into_iter()
            .map(|slot| TimeSlotResponse::new(slot, &state.time))
            .collect(),
    )))
}

#[axum::debug_handler]
pub async fn get_weekly_slots(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DataResponse<Vec<DaySlotsResponse>>>, AppError> {
    let week = state.slots.list_weekly_slots().await?;

    Ok(Json(DataResponse::new(
        week.into_iter()
            .map(|day| DaySlotsResponse::new(day, &state.time))
            .collect(),
    )))
}

/// Deletes a free slot. Booked slots must be cancelled first.
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, "time slot")?;
    state.slots.delete_slot(id).await?;

    Ok(Json(MessageResponse::ok("Time slot deleted")))
}

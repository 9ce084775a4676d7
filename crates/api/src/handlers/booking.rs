use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use slotbook_core::models::{
    booking::{BookingResponse, CreateBookingRequest},
    response::{BookingsResponse, DataResponse},
};
use std::sync::Arc;

use super::parse_id;
use crate::{middleware::error_handling::AppError, ApiState};

/// Books the free slot matching `{date, timeStart, timeEnd}` for the client.
///
/// # Errors
///
/// * `BookingError::Validation` - a client field is missing or blank (400)
/// * `BookingError::NotFound` - no slot with that exact window (404)
/// * `BookingError::AlreadyBooked` - the slot is taken (400)
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<BookingResponse>>), AppError> {
    let Json(payload) = payload?;
    let booking = state.bookings.create_booking(&payload).await?;

    let response = DataResponse::with_message(
        "Booking confirmed",
        BookingResponse::new(booking, &state.time),
    );
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<BookingResponse>>, AppError> {
    let id = parse_id(&id, "booking")?;
    let booking = state.bookings.get_booking(id).await?;

    Ok(Json(DataResponse::new(BookingResponse::new(booking, &state.time))))
}

#[axum::debug_handler]
pub async fn get_bookings_by_date(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state.bookings.list_bookings_by_date(&date).await?;

    Ok(Json(BookingsResponse::new(
        bookings
            .into_iter()
            .map(|booking| BookingResponse::new(booking, &state.time))
            .collect(),
    )))
}

#[axum::debug_handler]
pub async fn get_all_bookings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state.bookings.list_all_bookings().await?;

    Ok(Json(BookingsResponse::new(
        bookings
            .into_iter()
            .map(|booking| BookingResponse::new(booking, &state.time))
            .collect(),
    )))
}

/// Cancels a booking, freeing its slot. The removed booking is echoed back
/// with `status: "cancelled"`.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<BookingResponse>>, AppError> {
    let id = parse_id(&id, "booking")?;
    let booking = state.bookings.cancel_booking(id).await?;

    Ok(Json(DataResponse::with_message(
        "Booking cancelled",
        BookingResponse::new(booking, &state.time),
    )))
}

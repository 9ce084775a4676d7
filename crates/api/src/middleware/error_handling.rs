//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and the standard
//! `{success: false, message}` body. Client errors carry their descriptive
//! message; infrastructure failures are logged and answered with a generic
//! message.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use slotbook_core::errors::BookingError;
use slotbook_core::models::response::MessageResponse;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```ignore
/// async fn handler(State(state): State<Arc<ApiState>>) -> Result<Json<SlotsResponse>, AppError> {
///     let slots = state.slots.list_slots_by_date("2025-06-01").await?;
///     // ...
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::InvalidRange(_)
            | BookingError::SlotClash(_)
            | BookingError::AlreadyBooked(_)
            | BookingError::SlotBooked(_)
            | BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Database(_) | BookingError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = ?self.0, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        };

        (status, Json(MessageResponse::failure(message))).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Malformed or incomplete request bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}

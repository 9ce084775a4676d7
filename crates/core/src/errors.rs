use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Slot clash: {0}")]
    SlotClash(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Slot already booked: {0}")]
    AlreadyBooked(String),

    #[error("Slot is booked: {0}")]
    SlotBooked(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// True for errors caused by the caller's input or the current state of
    /// the calendar, as opposed to infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, BookingError::Database(_) | BookingError::Internal(_))
    }
}

pub type BookingResult<T> = Result<T, BookingError>;

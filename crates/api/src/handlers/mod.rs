pub mod booking;
pub mod time_slot;

use slotbook_core::errors::BookingError;
use uuid::Uuid;

/// Parses a path id, reporting malformed ids as a validation failure.
fn parse_id(raw: &str, resource: &str) -> Result<Uuid, BookingError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| BookingError::Validation(format!("Invalid {} ID '{}'", resource, raw)))
}

pub mod booking;
pub mod response;
pub mod time_slot;

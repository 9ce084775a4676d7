pub mod booking;
pub mod health;
pub mod time_slot;

//! # SlotBook Core
//!
//! Domain layer of the booking service: slot and booking models, the error
//! taxonomy, business-timezone conversion, the persistence traits and the
//! two managers that enforce the booking invariants.

pub mod booking_manager;
pub mod business_time;
pub mod errors;
pub mod models;
pub mod slot_manager;
pub mod store;

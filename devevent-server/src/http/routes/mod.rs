//! Route handlers organized by resource

pub mod bookings;
pub mod events;
pub mod health;

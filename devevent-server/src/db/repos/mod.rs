//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Rely on unique constraints, map violations to conflicts (no check-then-insert)
//! - List operations return newest first

pub mod bookings;
pub mod events;

pub use bookings::BookingRepo;
pub use events::EventRepo;

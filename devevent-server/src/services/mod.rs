//! Server-side actions shared by the HTTP routes

pub mod bookings;
pub mod events;

pub use bookings::{book_event, create_booking, list_bookings, BookingOutcome};
pub use events::{create_event, get_event, list_events, similar_events};

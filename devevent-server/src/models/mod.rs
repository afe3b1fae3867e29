//! Domain models with validation at construction
//!
//! All user input is validated before it reaches the store.
//! Invalid input returns field errors, not panic.

pub mod booking;
pub mod event;
pub mod slug;
pub mod validation;

pub use booking::{is_valid_email, Booking, BookingInput, NewBooking};
pub use event::{is_valid_time, normalize_date, Event, EventInput, EventMode, NewEvent};
pub use slug::{slugify, EventSlug};
pub use validation::{FieldDetail, FieldErrors, ValidationError};

//! Booking actions

use uuid::Uuid;

use crate::db::{BookingFilter, ConnectionCache, DocumentStore};
use crate::models::{Booking, BookingInput, FieldErrors, NewBooking, ValidationError};
use crate::{Error, Result};

/// Result of a booking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    Booked(Booking),
    /// An identical booking already exists; nothing was written.
    AlreadyBooked,
}

impl BookingOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Booked(_) => "Event booked successfully",
            Self::AlreadyBooked => "Event already booked",
        }
    }

    pub fn booking(&self) -> Option<&Booking> {
        match self {
            Self::Booked(booking) => Some(booking),
            Self::AlreadyBooked => None,
        }
    }
}

/// Book an event for an attendee.
///
/// Returns `None` without touching the store when any of event id, email
/// or slug is missing.
pub async fn book_event(
    db: &ConnectionCache,
    input: BookingInput,
) -> Result<Option<BookingOutcome>> {
    if !input.is_complete() {
        tracing::warn!("booking request is missing eventId, email or slug");
        return Ok(None);
    }

    let store = db.connect().await?;
    let booking = input.prepare()?;
    verify_reference(store.as_ref(), &booking).await?;

    let existing = store.find_bookings(&BookingFilter::exact(&booking)).await?;
    if !existing.is_empty() {
        tracing::debug!(event_id = %booking.event_id, "booking already exists");
        return Ok(Some(BookingOutcome::AlreadyBooked));
    }

    let created = insert(store.as_ref(), booking).await?;
    Ok(Some(BookingOutcome::Booked(created)))
}

/// Insert a booking after confirming its event exists and the slug is
/// that event's slug.
pub async fn create_booking(store: &dyn DocumentStore, booking: NewBooking) -> Result<Booking> {
    verify_reference(store, &booking).await?;
    insert(store, booking).await
}

/// The referenced event must exist and carry the booking's slug.
async fn verify_reference(store: &dyn DocumentStore, booking: &NewBooking) -> Result<()> {
    let event = match store.find_event_by_id(booking.event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return Err(Error::Reference {
                event_id: booking.event_id,
            })
        }
        Err(e) => return Err(Error::ReferenceLookup(e)),
    };

    if event.slug != booking.slug {
        return Err(FieldErrors::from(ValidationError::InvalidFormat {
            field: "slug",
            reason: "slug does not match the booked event",
        })
        .into());
    }
    Ok(())
}

async fn insert(store: &dyn DocumentStore, booking: NewBooking) -> Result<Booking> {
    let created = store.insert_booking(booking).await?;
    tracing::info!(id = %created.id, event_id = %created.event_id, "event booked");
    Ok(created)
}

/// Bookings, newest first, optionally limited to one event.
pub async fn list_bookings(db: &ConnectionCache, event_id: Option<Uuid>) -> Result<Vec<Booking>> {
    let store = db.connect().await?;
    let filter = event_id.map(BookingFilter::for_event).unwrap_or_default();
    Ok(store.find_bookings(&filter).await?)
}

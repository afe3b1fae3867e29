//! Document store interface
//!
//! Events and bookings live in independent collections linked by id.
//! There is no foreign key between them: booking references are checked by
//! the write path, while uniqueness (event slug, booking email) is enforced
//! by the store itself so it holds under concurrent writers.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Booking, Event, NewBooking, NewEvent};

/// Shared handle to a connected store
pub type StoreHandle = Arc<dyn DocumentStore>;

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated
    #[error("duplicate {resource} {field}")]
    Conflict {
        resource: &'static str,
        field: String,
    },

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// A stored row could not be decoded into a record
    #[error("corrupt {resource} record: {reason}")]
    Corrupt {
        resource: &'static str,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let (resource, field) = conflict_target(db.constraint());
                return Self::Conflict { resource, field };
            }
        }
        Self::Sqlx(e)
    }
}

/// Map a unique constraint name to the resource and field it guards.
fn conflict_target(constraint: Option<&str>) -> (&'static str, String) {
    match constraint {
        Some("events_slug_key") => ("event", "slug".to_string()),
        Some("bookings_email_key") => ("booking", "email".to_string()),
        Some(other) => ("record", other.to_string()),
        None => ("record", "value".to_string()),
    }
}

/// Booking query; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub event_id: Option<Uuid>,
    pub email: Option<String>,
    pub slug: Option<String>,
}

impl BookingFilter {
    /// Match bookings identical to `booking` on event, email and slug.
    pub fn exact(booking: &NewBooking) -> Self {
        Self {
            event_id: Some(booking.event_id),
            email: Some(booking.email.clone()),
            slug: Some(booking.slug.clone()),
        }
    }

    pub fn for_event(event_id: Uuid) -> Self {
        Self {
            event_id: Some(event_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.event_id.map_or(true, |id| booking.event_id == id)
            && self.email.as_deref().map_or(true, |e| booking.email == e)
            && self.slug.as_deref().map_or(true, |s| booking.slug == s)
    }
}

/// Persistence backend for events and bookings.
///
/// List operations return newest records first.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert an event. Fails with `Conflict` on a duplicate slug.
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError>;

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Other events sharing at least one tag with `event`.
    async fn find_similar_events(&self, event: &Event) -> Result<Vec<Event>, StoreError>;

    /// Insert a booking. Fails with `Conflict` on a duplicate email.
    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError>;

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError>;

    /// Release underlying connections.
    async fn close(&self);
}

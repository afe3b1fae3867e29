//! In-process document store
//!
//! Keeps both collections in memory behind one lock. Used for local runs
//! without PostgreSQL (`devevent serve --in-memory`) and in tests. Unique
//! slug and email checks happen under the write lock, so concurrent inserts
//! see the same guarantees as the database constraints.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::cache::{ConnectError, Connector};
use super::store::{BookingFilter, DocumentStore, StoreError, StoreHandle};
use crate::models::{Booking, Event, NewBooking, NewEvent};

#[derive(Default)]
struct Collections {
    /// Insertion order, oldest first
    events: Vec<Event>,
    bookings: Vec<Booking>,
}

/// Memory-backed store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.events.iter().any(|e| e.slug == event.slug) {
            return Err(StoreError::Conflict {
                resource: "event",
                field: "slug".to_string(),
            });
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: event.title,
            slug: event.slug,
            description: event.description,
            overview: event.overview,
            image: event.image,
            venue: event.venue,
            location: event.location,
            date: event.date,
            time: event.time,
            mode: event.mode,
            audience: event.audience,
            agenda: event.agenda,
            organizer: event.organizer,
            tags: event.tags,
            created_at: now,
            updated_at: now,
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.events.iter().rev().cloned().collect())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_similar_events(&self, event: &Event) -> Result<Vec<Event>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .events
            .iter()
            .rev()
            .filter(|e| e.id != event.id && e.shares_tag_with(event))
            .cloned()
            .collect())
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.bookings.iter().any(|b| b.email == booking.email) {
            return Err(StoreError::Conflict {
                resource: "booking",
                field: "email".to_string(),
            });
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            event_id: booking.event_id,
            email: booking.email,
            slug: booking.slug,
            created_at: now,
            updated_at: now,
        };
        inner.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .iter()
            .rev()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    async fn close(&self) {}
}

/// Connector that always hands out the same memory store.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(&self) -> Result<StoreHandle, ConnectError> {
        let store: StoreHandle = self.store.clone();
        Ok(store)
    }
}

//! Event actions
//!
//! Every action goes through the connection cache, so the first request
//! after startup opens the pool and later ones reuse it.

use crate::db::ConnectionCache;
use crate::models::{Event, EventInput, EventSlug};
use crate::Result;

/// Validate, normalize and store a new event.
///
/// Nothing is written when validation fails.
pub async fn create_event(db: &ConnectionCache, input: EventInput) -> Result<Event> {
    let store = db.connect().await?;
    let new_event = input.prepare(None)?;

    let event = store.insert_event(new_event).await?;
    tracing::info!(id = %event.id, slug = %event.slug, "event created");
    Ok(event)
}

/// All events, newest first.
pub async fn list_events(db: &ConnectionCache) -> Result<Vec<Event>> {
    let store = db.connect().await?;
    Ok(store.list_events().await?)
}

pub async fn get_event(db: &ConnectionCache, slug: &EventSlug) -> Result<Option<Event>> {
    let store = db.connect().await?;
    Ok(store.find_event_by_slug(slug.as_str()).await?)
}

/// Events sharing a tag with the event at `slug`.
///
/// Best effort: an unknown slug or any failure yields an empty list.
pub async fn similar_events(db: &ConnectionCache, slug: &str) -> Vec<Event> {
    match find_similar(db, slug).await {
        Ok(events) => events,
        Err(e) => {
            tracing::warn!(slug, error = %e, "similar events lookup failed");
            Vec::new()
        }
    }
}

async fn find_similar(db: &ConnectionCache, slug: &str) -> Result<Vec<Event>> {
    let store = db.connect().await?;
    let Some(event) = store.find_event_by_slug(slug).await? else {
        return Ok(Vec::new());
    };
    Ok(store.find_similar_events(&event).await?)
}

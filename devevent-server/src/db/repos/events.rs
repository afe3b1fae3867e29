//! Event repository
//!
//! - create: plain INSERT, the unique slug constraint rejects duplicates
//! - list: newest first
//! - similar: array overlap on tags

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::db::store::StoreError;
use crate::models::{Event, EventMode, NewEvent};

const EVENT_COLUMNS: &str = r#"
    id, title, slug, description, overview, image, venue, location,
    "date", "time", mode, audience, agenda, organizer, tags,
    created_at, updated_at
"#;

/// Event row as stored
#[derive(Debug, Clone, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    slug: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: NaiveDate,
    time: String,
    mode: String,
    audience: String,
    agenda: Vec<String>,
    organizer: String,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let mode = EventMode::parse(&row.mode).ok_or_else(|| StoreError::Corrupt {
            resource: "event",
            reason: format!("unknown mode '{}'", row.mode),
        })?;

        Ok(Event {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            overview: row.overview,
            image: row.image,
            venue: row.venue,
            location: row.location,
            date: row.date,
            time: row.time,
            mode,
            audience: row.audience,
            agenda: row.agenda,
            organizer: row.organizer,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_events(rows: Vec<EventRow>) -> Result<Vec<Event>, StoreError> {
    rows.into_iter().map(Event::try_from).collect()
}

/// Event repository
pub struct EventRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an event.
    ///
    /// No check-then-insert: a duplicate slug surfaces as a unique
    /// violation, mapped to `StoreError::Conflict`.
    pub async fn create(&self, event: NewEvent) -> Result<Event, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO events (
                title, slug, description, overview, image, venue, location,
                "date", "time", mode, audience, agenda, organizer, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {EVENT_COLUMNS}
            "#
        );

        let row: EventRow = sqlx::query_as(&sql)
            .bind(&event.title)
            .bind(&event.slug)
            .bind(&event.description)
            .bind(&event.overview)
            .bind(&event.image)
            .bind(&event.venue)
            .bind(&event.location)
            .bind(event.date)
            .bind(&event.time)
            .bind(event.mode.as_str())
            .bind(&event.audience)
            .bind(&event.agenda)
            .bind(&event.organizer)
            .bind(&event.tags)
            .fetch_one(self.pool)
            .await?;

        row.try_into()
    }

    /// All events, newest first.
    pub async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
        let rows: Vec<EventRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;
        into_events(rows)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        row.map(Event::try_from).transpose()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row: Option<EventRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.map(Event::try_from).transpose()
    }

    /// Events other than `event` whose tags overlap with its tags.
    pub async fn list_similar(&self, event: &Event) -> Result<Vec<Event>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE id <> $1 AND tags && $2 \
             ORDER BY created_at DESC"
        );
        let rows: Vec<EventRow> = sqlx::query_as(&sql)
            .bind(event.id)
            .bind(&event.tags)
            .fetch_all(self.pool)
            .await?;
        into_events(rows)
    }
}

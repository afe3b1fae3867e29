//! Database migrations for event and booking tables

use sqlx::PgPool;

/// Create tables and indexes if they do not exist yet.
///
/// `bookings.event_id` has no foreign key; the reference is
/// checked when a booking is written.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT NOT NULL,
            overview TEXT NOT NULL,
            image TEXT NOT NULL,
            venue TEXT NOT NULL,
            location TEXT NOT NULL,
            "date" DATE NOT NULL,
            "time" TEXT NOT NULL,
            mode TEXT NOT NULL CHECK (mode IN ('online', 'offline', 'hybrid')),
            audience TEXT NOT NULL,
            agenda TEXT[] NOT NULL,
            organizer TEXT NOT NULL,
            tags TEXT[] NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT events_slug_key UNIQUE (slug)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_id UUID NOT NULL,
            email TEXT NOT NULL,
            slug TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT bookings_email_key UNIQUE (email)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_event_id ON bookings(event_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_created_at ON events(created_at DESC)")
        .execute(pool)
        .await?;

    tracing::info!("Migrations complete");
    Ok(())
}

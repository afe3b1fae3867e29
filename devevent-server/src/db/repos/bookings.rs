//! Booking repository
//!
//! Duplicate emails are rejected by the `bookings_email_key` constraint.
//! The event reference is not a foreign key and is checked by the caller.

use sqlx::PgPool;

use crate::db::store::{BookingFilter, StoreError};
use crate::models::{Booking, NewBooking};

/// Booking repository
pub struct BookingRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BookingRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let row: Booking = sqlx::query_as(
            r#"
            INSERT INTO bookings (event_id, email, slug)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, email, slug, created_at, updated_at
            "#,
        )
        .bind(booking.event_id)
        .bind(&booking.email)
        .bind(&booking.slug)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Bookings matching every set field of `filter`, newest first.
    pub async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<Booking> = sqlx::query_as(
            r#"
            SELECT id, event_id, email, slug, created_at, updated_at
            FROM bookings
            WHERE ($1::uuid IS NULL OR event_id = $1)
              AND ($2::text IS NULL OR email = $2)
              AND ($3::text IS NULL OR slug = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.event_id)
        .bind(filter.email.as_deref())
        .bind(filter.slug.as_deref())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}

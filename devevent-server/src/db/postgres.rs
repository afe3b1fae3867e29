//! PostgreSQL-backed document store

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::cache::{ConnectError, Connector};
use super::migrations;
use super::pool::create_pool_with_options;
use super::repos::{BookingRepo, EventRepo};
use super::store::{BookingFilter, DocumentStore, StoreError, StoreHandle};
use crate::config::{PoolSettings, DATABASE_URL_ENV};
use crate::models::{Booking, Event, NewBooking, NewEvent};

/// Document store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        EventRepo::new(&self.pool).create(event).await
    }

    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        EventRepo::new(&self.pool).list().await
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>, StoreError> {
        EventRepo::new(&self.pool).get_by_slug(slug).await
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        EventRepo::new(&self.pool).get_by_id(id).await
    }

    async fn find_similar_events(&self, event: &Event) -> Result<Vec<Event>, StoreError> {
        EventRepo::new(&self.pool).list_similar(event).await
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        BookingRepo::new(&self.pool).create(booking).await
    }

    async fn find_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        BookingRepo::new(&self.pool).find(filter).await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Opens a pool against `DATABASE_URL` and runs migrations.
#[derive(Debug, Clone)]
pub struct PgConnector {
    database_url: Option<String>,
    settings: PoolSettings,
}

impl PgConnector {
    pub fn new(database_url: Option<String>, settings: PoolSettings) -> Self {
        Self {
            database_url,
            settings,
        }
    }
}

#[async_trait]
impl Connector for PgConnector {
    async fn connect(&self) -> Result<StoreHandle, ConnectError> {
        let url = self
            .database_url
            .as_deref()
            .ok_or(ConnectError::Configuration {
                var: DATABASE_URL_ENV,
            })?;

        let pool = create_pool_with_options(url, &self.settings)
            .await
            .map_err(ConnectError::connection)?;
        migrations::run(&pool)
            .await
            .map_err(ConnectError::connection)?;

        tracing::info!(
            max_connections = self.settings.max_connections,
            min_connections = self.settings.min_connections,
            "PostgreSQL pool ready"
        );
        let store: StoreHandle = Arc::new(PgStore::new(pool));
        Ok(store)
    }
}

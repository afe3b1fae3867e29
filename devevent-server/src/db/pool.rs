//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::PoolSettings;

/// Create a PostgreSQL connection pool with the default bounds.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/devevent").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, &PoolSettings::default()).await
}

/// Create a PostgreSQL connection pool with custom bounds.
///
/// The pool opens `min_connections` eagerly and never grows past
/// `max_connections`; waiting for a free connection is capped at
/// `acquire_timeout`.
pub async fn create_pool_with_options(
    database_url: &str,
    settings: &PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}

//! Database layer - connection cache, stores and repositories
//!
//! # Design Principles
//!
//! - One cached pool per process, opened lazily on first use
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Stores are reached through the `DocumentStore` trait so handlers do
//!   not care whether PostgreSQL or the memory store is behind it

pub mod cache;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod postgres;
pub mod repos;
pub mod store;

pub use cache::{ConnectError, ConnectionCache, Connector};
pub use memory::{MemoryConnector, MemoryStore};
pub use pool::create_pool;
pub use postgres::{PgConnector, PgStore};
pub use store::{BookingFilter, DocumentStore, StoreError, StoreHandle};

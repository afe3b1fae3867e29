//! devevent-server: event listings and bookings over HTTP
//!
//! Events and bookings are kept in a document store reached through a
//! process-wide connection cache. Admin submissions are validated and
//! normalized before they are stored; event images go to an external
//! media host.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod media;
pub mod models;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use http::{build_router, run_server, ServerConfig};
pub use state::AppState;

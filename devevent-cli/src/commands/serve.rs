//! HTTP server command
//!
//! Runs the DevEvent API: event listings, event creation and bookings.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use devevent_server::http::{run_server, ServerConfig};
use devevent_server::{AppConfig, AppState};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3000)
    #[arg(long, short = 'b', default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides DATABASE_URL from the environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep events and bookings in memory; any database URL is ignored
    #[arg(long)]
    pub in_memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut app_config = AppConfig::from_env();
    if args.database_url.is_some() {
        app_config.database_url = args.database_url;
    }

    if app_config.media.upload_url.is_none() {
        tracing::warn!("MEDIA_UPLOAD_URL not set; event creation will fail at image upload");
    }

    let state = if args.in_memory {
        tracing::info!("Using in-memory store; data is lost on shutdown");
        AppState::in_memory(app_config)
    } else {
        if app_config.database_url.is_none() {
            tracing::warn!("DATABASE_URL not set; requests needing the store will fail");
        }
        AppState::from_config(app_config)
    };

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    tracing::info!("Starting devevent server on {}", args.bind);

    // Blocks until shutdown
    run_server(Arc::new(state), config)
        .await
        .context("Server error")?;

    Ok(())
}

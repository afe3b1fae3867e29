//! Server configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (checked on first connect)
//! - `MEDIA_UPLOAD_URL`: upload endpoint of the media host
//! - `MEDIA_UPLOAD_PRESET`: optional unsigned upload preset
//! - `MEDIA_FOLDER`: destination folder for event images (default: DevEvent)

use std::time::Duration;

/// Environment variable holding the store address
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_MEDIA_FOLDER: &str = "DevEvent";

/// Connection pool bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on waiting for a pooled connection
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(45),
        }
    }
}

/// Media upload collaborator settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    pub upload_url: Option<String>,
    pub upload_preset: Option<String>,
    pub folder: String,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        Self {
            upload_url: env_var("MEDIA_UPLOAD_URL"),
            upload_preset: env_var("MEDIA_UPLOAD_PRESET"),
            folder: env_var("MEDIA_FOLDER").unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string()),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            upload_preset: None,
            folder: DEFAULT_MEDIA_FOLDER.to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Store address. Absence is reported on the first connection attempt.
    pub database_url: Option<String>,
    pub pool: PoolSettings,
    pub media: MediaConfig,
}

impl AppConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            database_url: env_var(DATABASE_URL_ENV),
            pool: PoolSettings::default(),
            media: MediaConfig::from_env(),
        }
    }
}

/// Read a variable, treating blank values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_defaults() {
        let pool = PoolSettings::default();
        assert_eq!(pool.max_connections, 10);
        assert_eq!(pool.min_connections, 5);
        assert_eq!(pool.acquire_timeout, Duration::from_secs(45));
    }

    #[test]
    fn media_defaults_to_devevent_folder() {
        let media = MediaConfig::default();
        assert_eq!(media.folder, "DevEvent");
        assert!(media.upload_url.is_none());
    }
}

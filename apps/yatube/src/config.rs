//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use yatube_core::pagination::POSTS_PER_PAGE;
use yatube_infra::{DatabaseConfig, JwtConfig, MediaConfig};

#[cfg(feature = "redis")]
use yatube_infra::RedisConfig;

/// Default cap on request bodies, uploads included.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub settings: Settings,
}

/// Knobs the handlers read at request time.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Lifetime of a cached index page.
    pub index_cache_ttl: Duration,
    pub posts_per_page: u64,
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_cache_ttl: Duration::from_secs(20),
            posts_per_page: POSTS_PER_PAGE,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            index_cache_ttl: parse_var("INDEX_CACHE_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.index_cache_ttl),
            posts_per_page: parse_var("POSTS_PER_PAGE")
                .filter(|n: &u64| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
            settings: Settings::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

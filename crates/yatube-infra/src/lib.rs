//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`:
//! persistence, caching, credentials and media storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and cache only
//! - `postgres` - PostgreSQL persistence via SeaORM
//! - `redis` - Redis-backed cache

pub mod auth;
pub mod cache;
pub mod database;
pub mod media;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{DatabaseConfig, InMemoryStore};
pub use media::{LocalMediaStorage, MediaConfig};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "redis")]
pub use cache::{RedisCache, RedisConfig};

//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{
    Cache, CacheError, CommentRepository, FollowRepository, GroupRepository, MediaStorage,
    PasswordService, PostRepository, TokenService, UserRepository,
};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryStore, JwtConfig, JwtTokenService,
    LocalMediaStorage, MediaConfig,
};

#[cfg(feature = "postgres")]
use yatube_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};
#[cfg(feature = "redis")]
use yatube_infra::RedisCache;

use crate::config::{AppConfig, Settings};

/// Startup failures that cannot be degraded to an in-memory fallback.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cache backend unavailable: {0}")]
    Cache(#[from] CacheError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub cache: Arc<dyn Cache>,
    pub media: Arc<dyn MediaStorage>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub settings: Settings,
    /// Names of the active backends, reported by the health check.
    pub backends: Backends,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Backends {
    pub database: &'static str,
    pub cache: &'static str,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn in_memory(store: InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            follows: Arc::new(store),
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db.clone())),
        }
    }
}

impl AppState {
    /// Build the application state, degrading to in-memory backends where allowed.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        #[cfg(feature = "postgres")]
        let (db, repos, database) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (Some(Arc::new(connections)), repos, "postgres")
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to database. Using in-memory fallback."
                    );
                    (None, Repositories::in_memory(InMemoryStore::new()), "memory")
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, Repositories::in_memory(InMemoryStore::new()), "memory")
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (repos, database) = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            (Repositories::in_memory(InMemoryStore::new()), "memory")
        };

        #[cfg(feature = "redis")]
        let (cache, cache_backend): (Arc<dyn Cache>, &'static str) = match &config.redis {
            Some(redis_config) => match RedisCache::new(redis_config).await {
                Ok(cache) => (Arc::new(cache), "redis"),
                Err(e) if redis_config.fallback_to_memory => {
                    tracing::warn!(error = %e, "Redis unavailable. Using in-memory cache.");
                    (Arc::new(InMemoryCache::new()), "memory")
                }
                Err(e) => return Err(e.into()),
            },
            None => (Arc::new(InMemoryCache::new()), "memory"),
        };

        #[cfg(not(feature = "redis"))]
        let (cache, cache_backend): (Arc<dyn Cache>, &'static str) =
            (Arc::new(InMemoryCache::new()), "memory");

        tracing::info!(
            database,
            cache = cache_backend,
            media_root = %config.media.root.display(),
            "Application state initialized"
        );

        #[allow(unused_mut)]
        let mut state = Self::assemble(
            repos,
            cache,
            config.media.clone(),
            config.jwt.clone(),
            config.settings.clone(),
            Backends {
                database,
                cache: cache_backend,
            },
        );
        #[cfg(feature = "postgres")]
        {
            state.db = db;
        }

        Ok(state)
    }

    /// State backed entirely by in-process stores.
    pub fn in_memory(settings: Settings, media: MediaConfig, jwt: JwtConfig) -> Self {
        Self::assemble(
            Repositories::in_memory(InMemoryStore::new()),
            Arc::new(InMemoryCache::new()),
            media,
            jwt,
            settings,
            Backends {
                database: "memory",
                cache: "memory",
            },
        )
    }

    fn assemble(
        repos: Repositories,
        cache: Arc<dyn Cache>,
        media: MediaConfig,
        jwt: JwtConfig,
        settings: Settings,
        backends: Backends,
    ) -> Self {
        Self {
            users: repos.users,
            groups: repos.groups,
            posts: repos.posts,
            comments: repos.comments,
            follows: repos.follows,
            cache,
            media: Arc::new(LocalMediaStorage::new(media)),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            settings,
            backends,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }
}

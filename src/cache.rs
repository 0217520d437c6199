//! Read-through cache of resolved users.
//!
//! Entries are written at sign-in and read by the auth middleware. The role
//! stored with a cached user is never trusted for access decisions; the
//! middleware re-reads it from the database on every request.

use std::fmt::Debug;

use async_trait::async_trait;
use dvdrental_cache::{CacheConfig, CacheError, RedisCache, keys};
use dvdrental_models::User;
use tracing::info;

#[async_trait]
pub trait UserCache: Send + Sync + Debug {
    /// Misses and backend failures both return `None`.
    async fn get(&self, user_id: i64) -> Option<User>;

    async fn set(&self, user: &User) -> Result<(), CacheError>;

    async fn evict(&self, user_id: i64) -> Result<(), CacheError>;
}

#[derive(Debug, Clone)]
pub struct RedisUserCache {
    cache: RedisCache,
    prefix: String,
}

impl RedisUserCache {
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let cache = RedisCache::new(&config.redis_url, config.default_ttl()).await?;
        info!(ttl_secs = config.default_ttl_seconds, "user cache connected");

        Ok(Self {
            cache,
            prefix: config.key_prefix.clone(),
        })
    }
}

#[async_trait]
impl UserCache for RedisUserCache {
    async fn get(&self, user_id: i64) -> Option<User> {
        self.cache.get(&keys::user(&self.prefix, user_id)).await
    }

    async fn set(&self, user: &User) -> Result<(), CacheError> {
        self.cache.set(&keys::user(&self.prefix, user.id), user).await
    }

    async fn evict(&self, user_id: i64) -> Result<(), CacheError> {
        self.cache.delete(&keys::user(&self.prefix, user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dvdrental_models::{Role, RoleName};

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_user_round_trip_without_password_hash() {
        let config = CacheConfig {
            enabled: true,
            key_prefix: "dvdrental-test".to_string(),
            ..CacheConfig::default()
        };
        let cache = RedisUserCache::connect(&config).await.unwrap();

        let user = User {
            id: 9001,
            email: "cache@example.com".to_string(),
            username: "cache".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            role: Role {
                id: 2,
                name: RoleName::Customer,
                level: 1,
            },
        };

        cache.set(&user).await.unwrap();
        let cached = cache.get(9001).await.unwrap();
        assert_eq!(cached.email, user.email);
        assert!(cached.password_hash.is_empty());

        cache.evict(9001).await.unwrap();
        assert!(cache.get(9001).await.is_none());
    }
}

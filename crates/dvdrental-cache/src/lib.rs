//! # DVD Rental Cache
//!
//! Redis-backed caching for the DVD rental API.
//!
//! - [`config`]: connection settings from environment variables
//! - [`keys`]: key layout
//! - [`redis`]: JSON get/set/delete over a multiplexed connection
//!
//! # Example
//!
//! ```ignore
//! use dvdrental_cache::{CacheConfig, RedisCache, keys};
//!
//! let config = CacheConfig::from_env();
//! let cache = RedisCache::new(&config.redis_url, config.default_ttl()).await?;
//! cache.set(&keys::user(&config.key_prefix, 42), &user).await?;
//! ```

pub mod config;
pub mod keys;
pub mod redis;

pub use config::CacheConfig;
pub use redis::{CacheError, RedisCache};

use std::sync::Arc;

use dvdrental_cache::CacheConfig;
use dvdrental_config::{AppConfig, CorsConfig, DatabaseConfig, JwtConfig, RateLimitConfig};
use dvdrental_db::{init_db_pool, run_migrations};
use tracing::{info, warn};

use crate::cache::{RedisUserCache, UserCache};
use crate::middleware::rate_limit::FixedWindowLimiter;
use crate::store::Store;

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Store,
    pub user_cache: Option<Arc<dyn UserCache>>,
    pub app_config: AppConfig,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub rate_limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(
        store: Store,
        app_config: AppConfig,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        let rate_limiter = Arc::new(FixedWindowLimiter::from_config(&rate_limit_config));
        Self {
            store,
            user_cache: None,
            app_config,
            jwt_config,
            cors_config,
            rate_limit_config,
            rate_limiter,
        }
    }

    pub fn with_user_cache(mut self, cache: Arc<dyn UserCache>) -> Self {
        self.user_cache = Some(cache);
        self
    }
}

/// Connects to the database (and Redis when enabled) and reads the remaining
/// configuration from the environment.
pub async fn init_app_state(app_config: AppConfig) -> anyhow::Result<AppState> {
    let db_config = DatabaseConfig::from_env();
    let pool = init_db_pool(&db_config).await?;

    if app_config.run_migrations {
        run_migrations(&pool).await?;
    }

    let state = AppState::new(
        Store::postgres(pool),
        app_config,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        RateLimitConfig::from_env(),
    );

    let cache_config = CacheConfig::from_env();
    if !cache_config.enabled {
        return Ok(state);
    }

    match RedisUserCache::connect(&cache_config).await {
        Ok(cache) => {
            info!("user cache enabled");
            Ok(state.with_user_cache(Arc::new(cache)))
        }
        Err(err) => {
            warn!(error = %err, "user cache unavailable, continuing without it");
            Ok(state)
        }
    }
}

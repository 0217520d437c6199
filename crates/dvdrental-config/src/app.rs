//! Process-level settings.
//!
//! # Environment Variables
//!
//! - `PORT_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `ENV`: deployment name reported by the health check (default `development`)
//! - `APP_VERSION`: version reported by the health check (default: crate version)
//! - `API_URL`: public base URL, used in the OpenAPI document (default `localhost:8080`)
//! - `BCRYPT_COST`: password hashing work factor, clamped to 4..=31 (default 12)
//! - `RUN_MIGRATIONS`: apply `migrations/` on startup (default `false`)

use std::env;

const DEFAULT_BCRYPT_COST: u32 = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub addr: String,
    pub env: String,
    pub version: String,
    pub api_url: String,
    pub bcrypt_cost: u32,
    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".to_string(),
            env: "development".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_url: "localhost:8080".to_string(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            run_migrations: false,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: env::var("PORT_ADDR").unwrap_or(defaults.addr),
            env: env::var("ENV").unwrap_or(defaults.env),
            version: env::var("APP_VERSION").unwrap_or(defaults.version),
            api_url: env::var("API_URL").unwrap_or(defaults.api_url),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .map(|cost| cost.clamp(4, 31))
                .unwrap_or(defaults.bcrypt_cost),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.run_migrations),
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

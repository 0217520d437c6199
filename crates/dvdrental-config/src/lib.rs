//! # DVD Rental Config
//!
//! Configuration types loaded from environment variables:
//!
//! - [`app`]: listen address, environment name, version, bcrypt cost
//! - [`database`]: PostgreSQL connection and pool sizing
//! - [`jwt`]: token secret, lifetime, issuer and audience
//! - [`cors`]: allowed origins
//! - [`rate_limit`]: fixed-window request limits
//!
//! # Example
//!
//! ```ignore
//! use dvdrental_config::{AppConfig, JwtConfig, RateLimitConfig};
//!
//! let app_config = AppConfig::from_env();
//! let jwt_config = JwtConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod app;
pub mod cors;
pub mod database;
pub mod duration;
pub mod jwt;
pub mod rate_limit;

pub use app::AppConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use duration::parse_duration;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;

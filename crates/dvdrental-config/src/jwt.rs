//! Token signing settings.
//!
//! # Environment Variables
//!
//! - `TOKEN_SECRET`: HMAC secret
//! - `TOKEN_EXP`: token lifetime, e.g. `72h` (default 3 days)
//! - `TOKEN_ISS`: issuer claim (default `dvdrental`)
//! - `TOKEN_AUD`: audience claim (default `dvdrental`)

use std::env;

use crate::duration::parse_duration;

const DEFAULT_EXPIRY_SECS: i64 = 3 * 24 * 3600;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiry: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "your-secret-key-change-in-production".to_string(),
            expiry: DEFAULT_EXPIRY_SECS,
            issuer: "dvdrental".to_string(),
            audience: "dvdrental".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: env::var("TOKEN_SECRET").unwrap_or(defaults.secret),
            expiry: env::var("TOKEN_EXP")
                .ok()
                .and_then(|v| parse_duration(&v))
                .and_then(|d| i64::try_from(d.as_secs()).ok())
                .unwrap_or(defaults.expiry),
            issuer: env::var("TOKEN_ISS").unwrap_or(defaults.issuer),
            audience: env::var("TOKEN_AUD").unwrap_or(defaults.audience),
        }
    }
}

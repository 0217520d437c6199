//! Fixed-window rate limiting configuration.
//!
//! Each client IP may send `requests_per_window` requests per
//! `window_secs`-second window. The counter resets when the window ends.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: default `true`
//! - `RATE_LIMIT_REQUESTS`: requests per window (default 100)
//! - `RATE_LIMIT_WINDOW_SECS`: window length in seconds (default 60)

use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,

    /// Requests admitted per client per window.
    pub requests_per_window: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_window: 100,
            window_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to the defaults for any variable that is unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            requests_per_window: std::env::var("RATE_LIMIT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.requests_per_window),
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.window_secs),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

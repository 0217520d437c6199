//! Cache key layout: `<prefix>:<entity>:<id>`.

/// Key for a cached user by id.
pub fn user(prefix: &str, user_id: i64) -> String {
    format!("{prefix}:user:{user_id}")
}

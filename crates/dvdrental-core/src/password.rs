//! Credential hashing backed by bcrypt.
//!
//! The work factor is passed in by the caller so each deployment can tune it
//! (`BCRYPT_COST`); production uses [`bcrypt::DEFAULT_COST`].

use anyhow::anyhow;
use bcrypt::{hash, verify};

use crate::AppError;

pub use bcrypt::DEFAULT_COST;

/// Hashes `password` with a random salt at the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost).map_err(|e| AppError::internal(anyhow!("failed to hash password: {e}")))
}

/// Checks `password` against a stored bcrypt hash.
///
/// Returns `Ok(false)` on mismatch. A malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash).map_err(|e| AppError::internal(anyhow!("failed to verify password: {e}")))
}

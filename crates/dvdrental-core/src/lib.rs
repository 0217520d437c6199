//! # DVD Rental Core
//!
//! Foundational types shared by every crate in the workspace:
//!
//! - [`errors`]: the HTTP-aware [`AppError`] and its JSON envelope
//! - [`password`]: bcrypt hashing and verification for stored credentials
//!
//! # Example
//!
//! ```ignore
//! use dvdrental_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("correct horse", bcrypt::DEFAULT_COST)?;
//! if !verify_password("correct horse", &hash)? {
//!     return Err(AppError::unauthorized("password mismatch"));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, verify_password};

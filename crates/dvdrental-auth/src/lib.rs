//! # DVD Rental Auth
//!
//! Stateless bearer tokens for the DVD rental API.
//!
//! - [`claims`]: the registered claims carried by every access token
//! - [`jwt`]: issuing and verifying HS256 tokens
//!
//! Tokens are never stored or revoked server-side; expiry is the only way a
//! token stops working. Verification also pins the issuer and audience to the
//! running configuration, so a token signed for another deployment sharing the
//! secret is rejected.
//!
//! # Example
//!
//! ```ignore
//! use dvdrental_auth::{create_access_token, verify_token};
//! use dvdrental_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id()?, 42);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, create_access_token_at, verify_token};

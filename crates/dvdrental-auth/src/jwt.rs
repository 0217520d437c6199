//! Issuing and verifying access tokens.
//!
//! Tokens are HS256-signed with the configured secret and carry
//! `sub`, `iat`, `nbf`, `exp`, `iss` and `aud`. Verification runs with zero
//! leeway and rejects any token whose issuer or audience differs from the
//! current [`JwtConfig`]. Every verification failure maps to the same
//! unauthorized error so callers cannot tell expiry from a bad signature.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use dvdrental_config::JwtConfig;
use dvdrental_core::AppError;

use crate::claims::Claims;

/// Creates an access token for `user_id`, valid from now for `jwt_config.expiry` seconds.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(user_id: i64, jwt_config: &JwtConfig) -> Result<String, AppError> {
    create_access_token_at(user_id, Utc::now().timestamp(), jwt_config)
}

/// Same as [`create_access_token`] with an explicit issue time in Unix seconds.
pub fn create_access_token_at(
    user_id: i64,
    issued_at: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: issued_at,
        nbf: issued_at,
        exp: issued_at + jwt_config.expiry,
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("failed to create token: {e}")))
}

/// Verifies signature, time bounds, issuer and audience, and returns the claims.
///
/// # Errors
///
/// Returns an unauthorized error for any invalid token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation(jwt_config),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::unauthorized(anyhow!("invalid token: {e}")))
}

fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[&jwt_config.issuer]);
    validation.set_audience(&[&jwt_config.audience]);
    validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);
    validation
}

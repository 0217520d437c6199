//! JWT claim structure for access tokens.

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registered claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim), as a decimal string
    pub sub: String,
    /// Issued-at timestamp (Unix seconds)
    pub iat: i64,
    /// Not-before timestamp (Unix seconds)
    pub nbf: i64,
    /// Expiration timestamp (Unix seconds)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

impl Claims {
    /// Parses the subject as a user id.
    pub fn user_id(&self) -> Result<i64, ParseIntError> {
        self.sub.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Claims {
        Claims {
            sub: "42".to_string(),
            iat: 1_700_000_000,
            nbf: 1_700_000_000,
            exp: 1_700_003_600,
            iss: "dvdrental".to_string(),
            aud: "dvdrental".to_string(),
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&sample()).unwrap();
        assert!(serialized.contains(r#""sub":"42""#));
        assert!(serialized.contains(r#""aud":"dvdrental""#));
    }

    #[test]
    fn test_user_id_parses_subject() {
        assert_eq!(sample().user_id().unwrap(), 42);
    }

    #[test]
    fn test_user_id_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            ..sample()
        };
        assert!(claims.user_id().is_err());
    }
}

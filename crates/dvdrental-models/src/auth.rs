//! Registration and sign-in DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of `POST /v1/auth/register`.
#[derive(Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserPayload {
    #[validate(required, email)]
    #[schema(example = "mike.hillyer@sakilastaff.com")]
    pub email: Option<String>,
    #[validate(required, length(min = 3, max = 20))]
    #[schema(example = "mike")]
    pub username: Option<String>,
    #[validate(required, length(min = 8, max = 72))]
    #[schema(example = "password123")]
    pub password: Option<String>,
}

impl RegisterUserPayload {
    pub fn into_registration(self) -> Option<Registration> {
        Some(Registration {
            email: self.email?,
            username: self.username?,
            password: self.password?,
        })
    }
}

/// Body of `POST /v1/auth/sign-in`.
#[derive(Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SignInPayload {
    #[validate(required, email)]
    #[schema(example = "mike.hillyer@sakilastaff.com")]
    pub email: Option<String>,
    #[validate(required, length(min = 8, max = 72))]
    #[schema(example = "password123")]
    pub password: Option<String>,
}

impl SignInPayload {
    pub fn into_credentials(self) -> Option<Credentials> {
        Some(Credentials {
            email: self.email?,
            password: self.password?,
        })
    }
}

#[derive(Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// Signed bearer token
    pub data: String,
}

// Passwords stay out of logs and spans.
macro_rules! redacted_debug {
    ($ty:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    $(.field(stringify!($field), &self.$field))*
                    .field("password", &"[redacted]")
                    .finish()
            }
        }
    };
}

redacted_debug!(RegisterUserPayload { email, username });
redacted_debug!(SignInPayload { email });
redacted_debug!(Registration { email, username });
redacted_debug!(Credentials { email });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_payload_bounds() {
        let ok = RegisterUserPayload {
            email: Some("jon@example.com".to_string()),
            username: Some("jon".to_string()),
            password: Some("password123".to_string()),
        };
        assert!(ok.validate().is_ok());

        let short_username = RegisterUserPayload {
            username: Some("jo".to_string()),
            ..ok.clone()
        };
        assert!(short_username.validate().is_err());

        let long_password = RegisterUserPayload {
            password: Some("p".repeat(73)),
            ..ok.clone()
        };
        assert!(long_password.validate().is_err());

        let bad_email = RegisterUserPayload {
            email: Some("not-an-email".to_string()),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let payload = SignInPayload {
            email: Some("jon@example.com".to_string()),
            password: Some("hunter2hunter2".to_string()),
        };
        let rendered = format!("{payload:?}");
        assert!(rendered.contains("jon@example.com"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn sign_in_rejects_unknown_fields() {
        let json = r#"{"email":"jon@example.com","password":"password123","remember":true}"#;
        assert!(serde_json::from_str::<SignInPayload>(json).is_err());
    }
}

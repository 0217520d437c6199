//! Role gates. They must run after [`require_auth`](super::auth::require_auth).

use anyhow::anyhow;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dvdrental_core::AppError;
use dvdrental_models::RoleName;
use tracing::error;

use super::auth::CurrentUser;

/// Lets only admins through; everyone else gets 401.
pub async fn require_admin(req: Request, next: Next) -> Response {
    match check_role(req.extensions().get::<CurrentUser>(), RoleName::Admin) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

fn check_role(current: Option<&CurrentUser>, required: RoleName) -> Result<(), AppError> {
    let Some(current) = current else {
        error!("role gate reached without an authenticated user");
        return Err(AppError::internal(anyhow!(
            "role gate reached without an authenticated user"
        )));
    };

    if current.role().name != required {
        return Err(AppError::unauthorized(anyhow!(
            "user {} has role {}, {} required",
            current.user().id,
            current.role().name,
            required
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use dvdrental_models::{Role, User};

    fn current(name: RoleName) -> CurrentUser {
        CurrentUser::new(User {
            id: 1,
            email: "someone@example.com".to_string(),
            username: "someone".to_string(),
            password_hash: String::new(),
            role: Role {
                id: 1,
                name,
                level: 1,
            },
        })
    }

    #[test]
    fn test_admin_passes() {
        assert!(check_role(Some(&current(RoleName::Admin)), RoleName::Admin).is_ok());
    }

    #[test]
    fn test_customer_is_unauthorized() {
        let err = check_role(Some(&current(RoleName::Customer)), RoleName::Admin).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_missing_user_is_internal_error() {
        let err = check_role(None, RoleName::Admin).unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

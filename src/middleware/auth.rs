use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use dvdrental_auth::verify_token;
use dvdrental_core::AppError;
use dvdrental_models::{Role, User};
use tracing::{debug, warn};

use crate::modules::auth::identity::IdentityResolver;
use crate::state::AppState;
use crate::store::StoreError;

/// The authenticated user of the current request.
///
/// Only [`require_auth`] can attach one, so a handler holding a
/// `CurrentUser` knows the bearer token was verified.
#[derive(Debug, Clone)]
pub struct CurrentUser(User);

impl CurrentUser {
    pub(crate) fn new(user: User) -> Self {
        Self(user)
    }

    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn role(&self) -> &Role {
        &self.0.role
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow!("handler mounted without auth middleware")))
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token for an
/// existing user whose role can be loaded.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).map_err(AppError::unauthorized)?;

    let claims = verify_token(token, &state.jwt_config)?;

    let user_id = claims
        .user_id()
        .map_err(|e| AppError::unauthorized(anyhow!("invalid subject {:?}: {e}", claims.sub)))?;

    let user = resolve_user(&state, user_id)
        .await
        .map_err(AppError::unauthorized)?;

    debug!(user_id = user.id, role = %user.role.name, "request authenticated");
    req.extensions_mut().insert(CurrentUser::new(user));

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, anyhow::Error> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| anyhow!("authorization header is missing"))?
        .to_str()
        .map_err(|_| anyhow!("authorization header is not visible ASCII"))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => Ok(*token),
        _ => Err(anyhow!("authorization header is malformed")),
    }
}

/// Cached users still get their role id and role re-read from the database,
/// so reassignments and role changes apply at once.
async fn resolve_user(state: &AppState, user_id: i64) -> Result<User, anyhow::Error> {
    let cached = match &state.user_cache {
        Some(cache) => cache.get(user_id).await,
        None => None,
    };

    let Some(mut user) = cached else {
        return Ok(IdentityResolver::new(&state.store).resolve_by_id(user_id).await?);
    };

    let role_id = match state.store.users.get_user_role_id(user_id).await {
        Ok(role_id) => role_id,
        Err(err) => {
            if err.is_not_found() {
                evict_cached_user(state, user_id).await;
            }
            return Err(anyhow!("failed to get user: {err}"));
        }
    };

    if role_id != user.role.id {
        debug!(user_id, cached = user.role.id, current = role_id, "cached role is stale");
        evict_cached_user(state, user_id).await;
    }

    match state.store.roles.get_role_by_id(role_id).await {
        Ok(role) => {
            user.role = role;
            Ok(user)
        }
        Err(err) => {
            if matches!(err, StoreError::NotFound | StoreError::UnknownRole(_)) {
                evict_cached_user(state, user_id).await;
            }
            Err(anyhow!("failed to get role: {err}"))
        }
    }
}

async fn evict_cached_user(state: &AppState, user_id: i64) {
    if let Some(cache) = &state.user_cache {
        if let Err(err) = cache.evict(user_id).await {
            warn!(user_id, error = %err, "failed to evict cached user");
        }
    }
}

use anyhow::anyhow;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use dvdrental_core::AppError;
use dvdrental_models::{RegisterUserPayload, SignInPayload, TokenResponse};
use tracing::instrument;

use super::service::AuthService;
use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a user for a pre-provisioned staff or customer email
#[utoipa::path(
    post,
    path = "/v1/auth/register",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation error, unknown email or already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserPayload>,
) -> Result<StatusCode, AppError> {
    let registration = payload
        .into_registration()
        .ok_or_else(|| AppError::bad_request(anyhow!("missing required registration field")))?;

    AuthService::register_user(&state, registration).await?;
    Ok(StatusCode::CREATED)
}

/// Sign in and receive a bearer token
#[utoipa::path(
    post,
    path = "/v1/auth/sign-in",
    request_body = SignInPayload,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Validation error or unknown account", body = ErrorResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn sign_in_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    let credentials = payload
        .into_credentials()
        .ok_or_else(|| AppError::bad_request(anyhow!("missing required sign-in field")))?;

    let token = AuthService::sign_in(&state, credentials).await?;
    Ok(Json(TokenResponse { data: token }))
}

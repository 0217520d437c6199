use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use dvdrental_core::AppError;
use dvdrental_models::CreateCustomerPayload;
use tracing::{info, instrument};

use crate::docs::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a customer record
#[utoipa::path(
    post,
    path = "/v1/customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Customer created"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token, or not an admin", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
#[instrument(skip(state))]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerPayload>,
) -> Result<StatusCode, AppError> {
    let customer = payload
        .into_new_customer()
        .ok_or_else(|| AppError::bad_request(anyhow!("missing required customer field")))?;

    state
        .store
        .customers
        .create_customer(customer)
        .await
        .map_err(AppError::internal)?;

    info!("customer created");
    Ok(StatusCode::CREATED)
}
